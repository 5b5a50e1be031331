use std::fmt;

/*-------------------------------------------------------------------------------------------------
  Source Status
-------------------------------------------------------------------------------------------------*/

/// Health of a range source for one check run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SourceStatus {
    /// The source answered normally.
    Ok,

    /// The source failed or returned nothing; the reason is kept for reporting.
    Degraded(String),
}

/*-------------------------------------------------------------------------------------------------
  Contribution
-------------------------------------------------------------------------------------------------*/

/// The raw range strings one source supplied to a check run, tagged with the source's
/// [SourceStatus]. A degraded contribution carries no ranges.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contribution {
    /// Source label (`built-in`, the ranges URL, or a load balancer name).
    pub source: String,

    /// Address and CIDR strings as supplied by the source, before parsing.
    pub ranges: Vec<String>,

    pub status: SourceStatus,
}

impl Contribution {
    pub fn ok<S: Into<String>>(source: S, ranges: Vec<String>) -> Self {
        Self {
            source: source.into(),
            ranges,
            status: SourceStatus::Ok,
        }
    }

    pub fn degraded<S: Into<String>, R: Into<String>>(source: S, reason: R) -> Self {
        Self {
            source: source.into(),
            ranges: Vec::new(),
            status: SourceStatus::Degraded(reason.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, SourceStatus::Degraded(_))
    }
}

impl fmt::Display for Contribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            SourceStatus::Ok => write!(f, "{}: {} range(s)", self.source, self.ranges.len()),
            SourceStatus::Degraded(reason) => write!(f, "{}: degraded ({})", self.source, reason),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_contribution_is_empty() {
        let contribution = Contribution::degraded("isc2", "Anypoint CLI exited with status 1");
        assert!(contribution.is_degraded());
        assert!(contribution.ranges.is_empty());
        assert_eq!(
            contribution.to_string(),
            "isc2: degraded (Anypoint CLI exited with status 1)"
        );
    }

    #[test]
    fn test_ok_contribution_display() {
        let contribution = Contribution::ok("isc2-np", vec!["10.0.0.0/24".to_string()]);
        assert!(!contribution.is_degraded());
        assert_eq!(contribution.to_string(), "isc2-np: 1 range(s)");
    }
}
