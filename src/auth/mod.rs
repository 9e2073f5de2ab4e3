pub mod tester;

pub use tester::{test_authentication_bypass, test_jwt_manipulation, JwtOutcome};
