//! Business services containing domain logic and use cases.

pub mod account;
pub mod delivery;
pub mod verification;

// Re-export commonly used types
pub use account::{AccountService, RegisterAccount};
pub use delivery::{DeliveryDispatcher, DeliverySender, RecordingDeliverySender};
pub use verification::{
    AttemptLimiter, CodeGenerator, ConfirmVerificationResult, FixedCodeGenerator,
    InMemoryAttemptLimiter, NoAttemptLimit, RandomCodeGenerator, StartVerificationResult,
    VerificationEvaluator, VerificationService, VerificationServiceConfig,
};
