use rocket::{Request, catch, response::content::RawHtml};

fn error_page(status: u16, message: &str) -> RawHtml<String> {
    RawHtml(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{status}</title></head>\n<body><h1>{status}</h1><p>{message}</p><p><a href=\"/\">Back to voting</a></p></body>\n</html>\n"
    ))
}

#[catch(400)]
pub fn bad_request(_req: &Request) -> RawHtml<String> {
    error_page(400, "Invalid request parameters.")
}

#[catch(404)]
pub fn not_found(_req: &Request) -> RawHtml<String> {
    error_page(404, "The requested resource was not found.")
}

#[catch(422)]
pub fn unprocessable(_req: &Request) -> RawHtml<String> {
    error_page(422, "The submitted form could not be read.")
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> RawHtml<String> {
    error_page(500, "An internal server error occurred.")
}
