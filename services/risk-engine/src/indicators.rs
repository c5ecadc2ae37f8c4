use serde::Serialize;

/// Validated patient indicators. Only [`crate::validate`] builds these.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthIndicators {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree: f64,
    pub age: f64,
}

impl HealthIndicators {
    /// Value by wire name.
    pub fn get(&self, name: &str) -> Option<f64> {
        Some(match name {
            "pregnancies" => self.pregnancies,
            "glucose" => self.glucose,
            "bloodPressure" => self.blood_pressure,
            "skinThickness" => self.skin_thickness,
            "insulin" => self.insulin,
            "bmi" => self.bmi,
            "diabetesPedigree" => self.diabetes_pedigree,
            "age" => self.age,
            _ => return None,
        })
    }

    pub(crate) fn set(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "pregnancies" => &mut self.pregnancies,
            "glucose" => &mut self.glucose,
            "bloodPressure" => &mut self.blood_pressure,
            "skinThickness" => &mut self.skin_thickness,
            "insulin" => &mut self.insulin,
            "bmi" => &mut self.bmi,
            "diabetesPedigree" => &mut self.diabetes_pedigree,
            "age" => &mut self.age,
            _ => return false,
        };
        *slot = value;
        true
    }
}
