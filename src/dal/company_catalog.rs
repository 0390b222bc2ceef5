use serde::Serialize;

use crate::domain::company::{Category, CompanyRecord, Source};

const EMBEDDED_COMPANIES: &str = include_str!("../../data/companies.json");

/// An existing customer that defines what an ICP-similar company looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IcpReference {
    pub company: &'static str,
    pub industry: &'static str,
    pub region: &'static str,
}

pub const ICP_REFERENCE: [IcpReference; 5] = [
    IcpReference {
        company: "Tata Consumer Products (TCPL)",
        industry: "FMCG / Food & Beverage",
        region: "India",
    },
    IcpReference {
        company: "Coca-Cola",
        industry: "Beverages",
        region: "Global",
    },
    IcpReference {
        company: "Condé Nast",
        industry: "Media / Publishing",
        region: "Global",
    },
    IcpReference {
        company: "Diageo",
        industry: "Spirits / Alcoholic Beverages",
        region: "Global",
    },
    IcpReference {
        company: "Shaddu.com",
        industry: "E-commerce / D2C",
        region: "India",
    },
];

/// Read access to pre-researched companies.
pub trait CompanyCatalog: Send + Sync {
    fn get_all(&self, category: Category) -> Vec<CompanyRecord>;

    fn all(&self) -> Vec<CompanyRecord>;
}

pub struct StaticCatalog {
    companies: Vec<CompanyRecord>,
}

impl StaticCatalog {
    pub fn new(companies: Vec<CompanyRecord>) -> Self {
        let companies = companies
            .into_iter()
            .map(|mut c| {
                c.source = Source::Static;
                c
            })
            .collect();
        StaticCatalog { companies }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(StaticCatalog::new(serde_json::from_str(json)?))
    }

    /// The dataset compiled into the binary.
    pub fn embedded() -> Result<Self, serde_json::Error> {
        StaticCatalog::from_json(EMBEDDED_COMPANIES)
    }
}

impl CompanyCatalog for StaticCatalog {
    fn get_all(&self, category: Category) -> Vec<CompanyRecord> {
        self.companies
            .iter()
            .filter(|c| c.category == category)
            .cloned()
            .collect()
    }

    fn all(&self) -> Vec<CompanyRecord> {
        self.companies.clone()
    }
}
