pub mod health_checks;
pub mod json_error;
pub mod request_result;
pub mod validated_json;

#[cfg(any(test, feature = "test-utils"))]
pub mod assertions;
