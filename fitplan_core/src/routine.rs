//! Fixed warm-up and cool-down routines shown alongside every training day.

use serde::Serialize;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct RoutineStep {
    pub name: &'static str,
    pub minutes: u32,
    pub description: &'static str,
}

pub const WARM_UP: [RoutineStep; 5] = [
    RoutineStep {
        name: "Neck circles",
        minutes: 1,
        description: "Slowly roll your neck in each direction 10 times.",
    },
    RoutineStep {
        name: "Shoulder rolls",
        minutes: 1,
        description: "Roll your shoulders forward, then backward, 15 times.",
    },
    RoutineStep {
        name: "Hip circles",
        minutes: 1,
        description: "Hands on your waist, circle your hips.",
    },
    RoutineStep {
        name: "Marching in place",
        minutes: 2,
        description: "March on the spot, raising the knees a little higher each time.",
    },
    RoutineStep {
        name: "Dynamic leg swings",
        minutes: 2,
        description: "Swing each leg forward and back, alternating sides.",
    },
];

pub const COOL_DOWN: [RoutineStep; 5] = [
    RoutineStep {
        name: "Slow walk",
        minutes: 2,
        description: "Walk slowly to bring your heart rate down.",
    },
    RoutineStep {
        name: "Quad stretch",
        minutes: 1,
        description: "Hold your foot behind you and pull it toward your glutes.",
    },
    RoutineStep {
        name: "Hamstring stretch",
        minutes: 1,
        description: "Straighten one leg and lean toward your toes.",
    },
    RoutineStep {
        name: "Chest and shoulder opener",
        minutes: 1,
        description: "Clasp your hands behind your back and open the chest.",
    },
    RoutineStep {
        name: "Deep breathing",
        minutes: 2,
        description: "Inhale 4 s, hold 4 s, exhale 6 s.",
    },
];

pub fn total_minutes(steps: &[RoutineStep]) -> u32 {
    steps.iter().map(|s| s.minutes).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routines_take_seven_minutes() {
        assert_eq!(total_minutes(&WARM_UP), 7);
        assert_eq!(total_minutes(&COOL_DOWN), 7);
    }
}
