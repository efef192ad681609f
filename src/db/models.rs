use sqlx::FromRow;

/// A horse in the household.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Horse {
    pub id: i64,
    pub name: String,
}

/// A blanket owned by one horse, suitable for an inclusive range of
/// apparent temperatures (°F).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Blanket {
    pub id: i64,
    pub horse_id: i64,
    pub name: String,
    pub min_temp: i32,
    pub max_temp: i32,
}

impl Blanket {
    /// Whether `temp` lies within `[min_temp, max_temp]`.
    pub fn covers(&self, temp: f64) -> bool {
        f64::from(self.min_temp) <= temp && temp <= f64::from(self.max_temp)
    }
}

/// A horse together with its blankets in stored (id ascending) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorseWithBlankets {
    pub horse: Horse,
    pub blankets: Vec<Blanket>,
}
