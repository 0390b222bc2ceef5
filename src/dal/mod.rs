pub mod company_catalog;
