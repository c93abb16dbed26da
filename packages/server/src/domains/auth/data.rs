use serde::{Deserialize, Serialize};

use crate::domains::agencies::AgencyData;
use crate::domains::users::UserData;

/// Agency details collected by the sign-up form
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpAgency {
    pub name: String,
    pub slug: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub billing_address: Option<String>,
    pub billing_city: Option<String>,
    pub billing_zip: Option<String>,
    pub billing_country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub agency: SignUpAgency,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MagicLinkRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MagicLinkVerifyInput {
    pub token: String,
}

/// Profile plus agency, as loaded on app start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user: UserData,
    pub agency: AgencyData,
}

/// Result of a successful sign-in or sign-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserData,
    pub agency: AgencyData,
}
