use serde::Serialize;

/// A food item sitting on one grid cell. Never changes after it is spawned;
/// it disappears when a creature lands exactly on it and eats it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Food {
    x: i32,
    y: i32,
    name: String,
}

impl Food {
    pub fn new(x: i32, y: i32, name: impl Into<String>) -> Self {
        Food {
            x,
            y,
            name: name.into(),
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
