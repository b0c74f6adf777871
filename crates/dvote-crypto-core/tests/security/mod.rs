mod entropy_quality;
mod mlock_verification;
mod redaction;
