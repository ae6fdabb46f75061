use serde::Serialize;
use strum_macros::{Display, EnumIter};

use crate::model::parameters::Parameters;

/// Which k factor currently applies to a fencer.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum KFactorRegime {
    #[strum(serialize = "freshman")]
    Freshman,
    #[strum(serialize = "top")]
    Top,
    #[strum(serialize = "others")]
    Others
}

impl KFactorRegime {
    pub fn k_factor(self, parameters: &Parameters) -> f64 {
        match self {
            KFactorRegime::Freshman => parameters.k_factor_freshmen,
            KFactorRegime::Top => parameters.k_factor_top,
            KFactorRegime::Others => parameters.k_factor_others
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{parameters::Parameters, structures::k_factor_regime::KFactorRegime};
    use strum::IntoEnumIterator;

    #[test]
    fn test_k_factor_lookup() {
        let parameters = Parameters::default();

        assert_eq!(KFactorRegime::Freshman.k_factor(&parameters), 40.0);
        assert_eq!(KFactorRegime::Top.k_factor(&parameters), 25.0);
        assert_eq!(KFactorRegime::Others.k_factor(&parameters), 32.0);
    }

    #[test]
    fn test_display() {
        let names = KFactorRegime::iter().map(|r| r.to_string()).collect::<Vec<_>>();
        assert_eq!(names, vec!["freshman", "top", "others"]);
    }
}
