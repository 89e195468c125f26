// file: src/models/ioc.rs
// description: indicators of compromise model for threat intelligence
// reference: stix ioc standards

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IocType {
    Ip = 1,
    Url = 2,
    Email = 3,
    Hash = 4,
}

impl IocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IocType::Ip => "ip",
            IocType::Url => "url",
            IocType::Email => "email",
            IocType::Hash => "hash",
        }
    }
}

/// A refanged IOC of any kind. Only `Ip` values are normalized further.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ioc {
    pub ioc_type: IocType,
    pub value: String,
}

impl Ioc {
    pub fn new(ioc_type: IocType, value: String) -> Self {
        Self { ioc_type, value }
    }

    pub fn is_ip(&self) -> bool {
        self.ioc_type == IocType::Ip
    }
}
