use serde::{Deserialize, Serialize};

/// Slope and intercept of a linear equation that maps ambient dry-bulb
/// temperature to the heat rejection capacity of a unit, in power terms.
/// Fit diagnostics are carried along for stored curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionCurve {
    pub a: f64,
    pub b: f64,
    #[serde(default)]
    pub r: Option<f64>,
    #[serde(default)]
    pub p: Option<f64>,
    #[serde(default)]
    pub serr: Option<f64>,
}

impl RejectionCurve {
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            a,
            b,
            r: None,
            p: None,
            serr: None,
        }
    }

    pub fn r_squared(&self) -> Option<f64> {
        self.r.map(|r| r * r)
    }
}

/// Cooling unit: removes heat from the compute load at its rated capacity
/// (watts of supported load).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cooling {
    pub name: String,
    pub capacity: f64,
    pub pue: f64,
    pub price: f64,
    #[serde(default)]
    pub number_of_rigs: Option<f64>,
}

/// Heat rejection unit: moves heat to ambient air. Capacity derates linearly
/// with ambient dry-bulb temperature per the stored curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatRejection {
    pub name: String,
    pub capacity: f64,
    pub pue: f64,
    pub price: f64,
    pub curve: RejectionCurve,
    pub design_dry_bulb: f64,
}

impl HeatRejection {
    /// Rejection capacity at an ambient temperature, from the linear curve.
    /// A negative extrapolation is clamped to zero: the stored curves are
    /// regression fits and can cross below zero outside their fitted range.
    pub fn capacity_at(&self, ambient_temp: f64) -> f64 {
        (self.curve.a * ambient_temp + self.curve.b).max(0.0)
    }
}

/// Electrical gear (transformers, switchgear) sized on total facility power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Electrical {
    pub name: String,
    pub capacity: f64,
    pub pue: f64,
    pub price: f64,
}

/// One of the three infrastructure kinds a project can carry. Replaces the
/// loosely-typed infrastructure reference of the persistence layer with a
/// tagged union resolved at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Infrastructure {
    Cooling(Cooling),
    HeatRejection(HeatRejection),
    Electrical(Electrical),
}

impl Infrastructure {
    pub fn name(&self) -> &str {
        match self {
            Infrastructure::Cooling(c) => &c.name,
            Infrastructure::HeatRejection(h) => &h.name,
            Infrastructure::Electrical(e) => &e.name,
        }
    }

    /// Rated capacity in watts of supported load.
    pub fn capacity(&self) -> f64 {
        match self {
            Infrastructure::Cooling(c) => c.capacity,
            Infrastructure::HeatRejection(h) => h.capacity,
            Infrastructure::Electrical(e) => e.capacity,
        }
    }

    pub fn pue(&self) -> f64 {
        match self {
            Infrastructure::Cooling(c) => c.pue,
            Infrastructure::HeatRejection(h) => h.pue,
            Infrastructure::Electrical(e) => e.pue,
        }
    }

    pub fn price(&self) -> f64 {
        match self {
            Infrastructure::Cooling(c) => c.price,
            Infrastructure::HeatRejection(h) => h.price,
            Infrastructure::Electrical(e) => e.price,
        }
    }
}
