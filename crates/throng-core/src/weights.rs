//! The four-component social-force weight profile.

use std::fmt;

/// Social-force weights for one cell/window: goal-seeking, grouping,
/// interaction, and connectivity.
///
/// The first three components are a convex combination (they sum to 1
/// after reconstruction); connection is independent in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightProfile {
    /// Goal-seeking weight.
    pub goal: f64,
    /// Social-grouping weight.
    pub group: f64,
    /// Interaction weight.
    pub interaction: f64,
    /// Connectivity weight.
    pub connection: f64,
}

impl WeightProfile {
    /// Construct a profile from its four components.
    pub fn new(goal: f64, group: f64, interaction: f64, connection: f64) -> Self {
        Self {
            goal,
            group,
            interaction,
            connection,
        }
    }

    /// The fallback profile assigned to cells without enough observed
    /// traffic: fully goal-driven with high baseline connectivity.
    pub fn fallback() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.75)
    }

    /// The profile as a flat array, in (goal, group, interaction,
    /// connection) order. Used by profile clustering.
    pub fn to_array(self) -> [f64; 4] {
        [self.goal, self.group, self.interaction, self.connection]
    }
}

impl fmt::Display for WeightProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(goal {:.2}, group {:.2}, interact {:.2}, conn {:.2})",
            self.goal, self.group, self.interaction, self.connection
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_goal_driven() {
        let p = WeightProfile::fallback();
        assert_eq!(p.goal, 1.0);
        assert_eq!(p.group, 0.0);
        assert_eq!(p.interaction, 0.0);
        assert_eq!(p.connection, 0.75);
    }

    #[test]
    fn array_roundtrip_order() {
        let p = WeightProfile::new(0.5, 0.3, 0.2, 0.9);
        assert_eq!(p.to_array(), [0.5, 0.3, 0.2, 0.9]);
    }
}
