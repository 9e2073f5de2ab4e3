pub mod jwt_analyzer;

pub use jwt_analyzer::decode_unverified;
