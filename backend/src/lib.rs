pub mod catchers;
pub mod config;
pub mod error;
pub mod processor;
pub mod render;
pub mod routes;
pub mod store;
pub mod telemetry;
pub use shared::{models::*, error::*, validation::*};

use rocket::{Build, Rocket};

use crate::catchers::{bad_request, internal_error, not_found, unprocessable};
use crate::routes::{cast_vote, index, AppState};

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/", rocket::routes![index, cast_vote])
        .register(
            "/",
            rocket::catchers![bad_request, not_found, unprocessable, internal_error],
        )
}

#[cfg(test)]
mod tests;
