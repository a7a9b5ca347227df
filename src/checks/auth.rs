//! Registration and login

use tracing::info;

use super::FatalError;
use crate::executor::Recorder;
use crate::http::ApiClient;
use crate::models::{
    parse_object, Registration, RequestOutcome, ResponseError, Session, Step, StepResult, Suite,
    TokenResponse,
};

/// Register the run's user, then log in as it
///
/// A registration that yields no token is fatal since every later endpoint
/// needs one. A failed login is only recorded; the registration token stays
/// in the session.
pub async fn authenticate(
    client: &ApiClient,
    session: &mut Session,
    registration: &Registration,
    recorder: &mut Recorder,
) -> Result<(), FatalError> {
    let scope = Suite::Auth.name();

    let outcome = client
        .post(session, "/register", &registration.payload())
        .await?;
    match token_of(&outcome) {
        Ok(token) => {
            session.set_token(token);
            recorder.record(StepResult::pass(
                scope,
                Step::Register,
                outcome.duration_ms(),
                format!("User registered: {}", registration.name),
            ));
        }
        Err(e) => {
            recorder.record(StepResult::fail(
                scope,
                Step::Register,
                outcome.duration_ms(),
                format!("Failed to register: {e}"),
            ));
            return Err(FatalError::AuthenticationFailed(format!(
                "could not register {}: {e}",
                registration.name
            )));
        }
    }

    let outcome = client
        .post(session, "/login", &registration.login_payload())
        .await?;
    let login = match token_of(&outcome) {
        Ok(token) => {
            session.set_token(token);
            info!("Logged in as {}", registration.name);
            StepResult::pass(
                scope,
                Step::Login,
                outcome.duration_ms(),
                "User logged in successfully",
            )
        }
        Err(e) => StepResult::fail(
            scope,
            Step::Login,
            outcome.duration_ms(),
            format!("Failed to login: {e}"),
        ),
    };
    recorder.record(login);

    Ok(())
}

/// Non-empty token carried by an auth response
fn token_of(outcome: &RequestOutcome) -> Result<String, ResponseError> {
    parse_object::<TokenResponse>(outcome, "a token response")?
        .token
        .filter(|token| !token.is_empty())
        .ok_or(ResponseError::MissingField("token"))
}
