//! Application state shared across handlers

use sqlx::PgPool;

use crate::repositories::{
    UserRepository, contact::ContactEnquiryRepository, enquiry::ProductEnquiryRepository,
    product::ProductRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub product_repository: ProductRepository,
    pub product_enquiry_repository: ProductEnquiryRepository,
    pub contact_enquiry_repository: ContactEnquiryRepository,
}
