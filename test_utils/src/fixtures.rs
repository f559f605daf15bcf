//! Convenience constructors for entities used in tests.

use skirmish::{Blob, Desc, Entity, Location, Part, World};

/// Fluent builder for [`Blob`] parts.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlobBuilder(Blob);

impl BlobBuilder {
    /// Starts from a zeroed blob.
    ///
    /// # Examples
    /// ```
    /// use test_utils::BlobBuilder;
    /// let blob = BlobBuilder::new().armor(4).energy(-3).build();
    /// assert_eq!((blob.armor, blob.energy), (4, -3));
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the energy.
    pub fn energy(mut self, energy: i32) -> Self {
        self.0.energy = energy;
        self
    }

    /// Sets the power credited each turn.
    pub fn power(mut self, power: i32) -> Self {
        self.0.power = power;
        self
    }

    /// Sets the armor.
    pub fn armor(mut self, armor: i32) -> Self {
        self.0.armor = armor;
        self
    }

    /// Sets the shot damage.
    pub fn damage(mut self, damage: i32) -> Self {
        self.0.damage = damage;
        self
    }

    /// Marks the blob as big.
    pub fn big(mut self) -> Self {
        self.0.big = true;
        self
    }

    /// Finishes the blob.
    pub fn build(self) -> Blob {
        self.0
    }
}

/// Small blob with the given energy, power and armor.
pub fn blob(energy: i32, power: i32, armor: i32) -> Blob {
    BlobBuilder::new()
        .energy(energy)
        .power(power)
        .armor(armor)
        .build()
}

/// Big blob with the given armor and nothing else.
pub fn big_blob(armor: i32) -> Blob {
    BlobBuilder::new().armor(armor).big().build()
}

/// Spawns an entity named `name` carrying `blob` at `(x, y)`.
///
/// # Panics
/// Panics if the world rejects the spawn.
pub fn spawn_at(world: &mut World, name: &str, (x, y): (i32, i32), blob: Blob) -> Entity {
    let parts: Vec<Part> = vec![Desc::new(name).into(), blob.into()];
    world
        .spawn(Location::new(x, y), parts)
        .unwrap_or_else(|e| panic!("failed to spawn {name}: {e}"))
}
