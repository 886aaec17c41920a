pub mod document;
pub mod invoice;

pub use document::InvoiceDocumentRenderer;
pub use invoice::InvoiceService;
