use rocket::http::Status;
use rocket::response::Responder;
use shared::VoteError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ApiError(#[from] pub VoteError);

impl ApiError {
    pub fn status(&self) -> Status {
        Status::from_code(self.0.status_code()).unwrap_or(Status::InternalServerError)
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if self.0.is_client_error() {
            warn!(path = %req.uri(), "Rejected request: {}", self.0);
        } else {
            error!(path = %req.uri(), status = status.code, "Request failed: {}", self.0);
        }

        rocket::Response::build_from(self.to_string().respond_to(req)?)
            .status(status)
            .ok()
    }
}
