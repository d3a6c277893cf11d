//! 验证码存储实现

mod memory;
mod redis;

pub use memory::MemoryCodeStore;
pub use redis::RedisCodeStore;

use crate::CodeError;
use crate::domain::VerifyOutcome;

fn outcome_to_result(outcome: VerifyOutcome) -> Result<(), CodeError> {
    match outcome {
        VerifyOutcome::Ok => Ok(()),
        VerifyOutcome::NotFound => Err(CodeError::CodeNotFound),
        VerifyOutcome::TooManyVerifies => Err(CodeError::TooManyVerifies),
        VerifyOutcome::Mismatch => Err(CodeError::CodeMismatch),
    }
}
