use serde::{Deserialize, Serialize};

use crate::domains::agencies::models::Agency;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgencyData {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub billing_address: Option<String>,
    pub billing_city: Option<String>,
    pub billing_zip: Option<String>,
    pub billing_country: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Agency> for AgencyData {
    fn from(agency: Agency) -> Self {
        Self {
            id: agency.id.to_string(),
            name: agency.name,
            slug: agency.slug,
            logo_url: agency.logo_url,
            website: agency.website,
            phone: agency.phone,
            primary_color: agency.primary_color,
            secondary_color: agency.secondary_color,
            billing_address: agency.billing_address,
            billing_city: agency.billing_city,
            billing_zip: agency.billing_zip,
            billing_country: agency.billing_country,
            created_at: agency.created_at.to_rfc3339(),
            updated_at: agency.updated_at.to_rfc3339(),
        }
    }
}
