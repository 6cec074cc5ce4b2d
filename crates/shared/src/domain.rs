use serde::{Deserialize, Serialize};

macro_rules! name_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

name_newtype!(BrandName);
name_newtype!(ApplianceName);
name_newtype!(IssueName);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeLevel {
    Brand,
    Appliance,
    Issue,
    Solution,
}

impl CascadeLevel {
    pub fn downstream(self) -> &'static [CascadeLevel] {
        match self {
            CascadeLevel::Brand => &[
                CascadeLevel::Appliance,
                CascadeLevel::Issue,
                CascadeLevel::Solution,
            ],
            CascadeLevel::Appliance => &[CascadeLevel::Issue, CascadeLevel::Solution],
            CascadeLevel::Issue => &[CascadeLevel::Solution],
            CascadeLevel::Solution => &[],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub brand: Option<BrandName>,
    pub appliance: Option<ApplianceName>,
    pub issue: Option<IssueName>,
}

impl Selection {
    pub fn is_complete(&self) -> bool {
        self.brand.is_some() && self.appliance.is_some() && self.issue.is_some()
    }

    // Invariant: appliance is set only under a brand, issue only under an appliance.
    pub fn set_brand(&mut self, brand: Option<BrandName>) {
        self.brand = brand;
        self.appliance = None;
        self.issue = None;
    }

    pub fn set_appliance(&mut self, appliance: Option<ApplianceName>) {
        self.appliance = appliance;
        self.issue = None;
    }

    pub fn set_issue(&mut self, issue: Option<IssueName>) {
        self.issue = issue;
    }
}
