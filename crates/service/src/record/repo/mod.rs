pub mod seaorm;

pub use seaorm::SeaOrmRecordRepository;
