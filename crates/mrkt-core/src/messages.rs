//! Fixed user-facing messages

pub const INCORRECT_CREDENTIALS: &str = "The details you entered seem to be incorrect.";
pub const ACCESS_DENIED: &str = "You do not have permission to access this resource.";
pub const INVALID_PARAMS: &str = "The data you provided is incorrect.";

/// `This {resource} was not found.`
pub fn resource_not_found(resource: &str) -> String {
    format!("This {} was not found.", resource)
}

/// `This {resource} already exists.`
pub fn resource_exists(resource: &str) -> String {
    format!("This {} already exists.", resource)
}

/// `The {resource} you entered is invalid.`
pub fn invalid_param(resource: &str) -> String {
    format!("The {} you entered is invalid.", resource)
}
