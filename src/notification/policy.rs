use std::fmt::Display;
use std::str::FromStr;

use super::error::NotifierError;

/// Which of the start, success and fail notifications get registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    #[default]
    All,
    StartOnly,
    FailOnly,
    SuccessOnly,
    SuccessAndFail,
    StartAndFail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phases {
    pub start: bool,
    pub success: bool,
    pub fail: bool,
}

impl Policy {
    pub const ALL: [Policy; 6] = [
        Policy::All,
        Policy::StartOnly,
        Policy::FailOnly,
        Policy::SuccessOnly,
        Policy::SuccessAndFail,
        Policy::StartAndFail,
    ];

    pub fn phases(&self) -> Phases {
        let (start, success, fail) = match self {
            Policy::All => (true, true, true),
            Policy::StartOnly => (true, false, false),
            Policy::FailOnly => (false, false, true),
            Policy::SuccessOnly => (false, true, false),
            Policy::SuccessAndFail => (false, true, true),
            Policy::StartAndFail => (true, false, true),
        };
        Phases {
            start,
            success,
            fail,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::All => "all",
            Policy::StartOnly => "start-only",
            Policy::FailOnly => "fail-only",
            Policy::SuccessOnly => "success-only",
            Policy::SuccessAndFail => "success-and-fail",
            Policy::StartAndFail => "start-and-fail",
        }
    }
}

impl Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = NotifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Policy::All),
            "start-only" | "start" | "only_start" => Ok(Policy::StartOnly),
            "fail-only" | "fail" | "only_fail" => Ok(Policy::FailOnly),
            "success-only" | "success" | "only_success" => Ok(Policy::SuccessOnly),
            "success-and-fail" | "success_and_fail" => Ok(Policy::SuccessAndFail),
            "start-and-fail" | "start_and_fail" => Ok(Policy::StartAndFail),
            _ => Err(NotifierError::InvalidPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_names_and_aliases() -> Result<(), anyhow::Error> {
        for policy in Policy::ALL {
            assert_eq!(policy, policy.name().parse::<Policy>()?);
        }
        assert_eq!(Policy::StartOnly, "only_start".parse::<Policy>()?);
        assert_eq!(Policy::FailOnly, "fail".parse::<Policy>()?);
        assert_eq!(Policy::SuccessOnly, "only_success".parse::<Policy>()?);
        assert_eq!(Policy::SuccessAndFail, "success_and_fail".parse::<Policy>()?);
        assert_eq!(Policy::StartAndFail, "start_and_fail".parse::<Policy>()?);
        Ok(())
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Err(NotifierError::InvalidPolicy("sometimes".to_string())),
            "sometimes".parse::<Policy>()
        );
        assert_eq!(
            Err(NotifierError::InvalidPolicy("All".to_string())),
            "All".parse::<Policy>()
        );
    }

    #[test]
    fn test_phases() {
        assert_eq!(
            Phases {
                start: true,
                success: true,
                fail: true
            },
            Policy::All.phases()
        );
        assert_eq!(
            Phases {
                start: false,
                success: true,
                fail: true
            },
            Policy::SuccessAndFail.phases()
        );
        assert_eq!(
            Phases {
                start: true,
                success: false,
                fail: true
            },
            Policy::StartAndFail.phases()
        );
        assert!(!Policy::FailOnly.phases().start);
        assert!(!Policy::SuccessOnly.phases().fail);
        assert!(!Policy::StartOnly.phases().success);
    }
}
