pub mod invoices;
pub mod orders;
pub mod reports;
pub mod reservations;

use std::sync::Arc;

use crate::db::DbPool;

/// Aggregated services used by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub reservations: reservations::ReservationService,
    pub orders: orders::OrderService,
    pub invoices: invoices::InvoiceService,
    pub reports: reports::ReportService,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            reservations: reservations::ReservationService::new(db.clone()),
            orders: orders::OrderService::new(db.clone()),
            invoices: invoices::InvoiceService::new(db.clone()),
            reports: reports::ReportService::new(db),
        }
    }
}
