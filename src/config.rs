use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level simulation settings, loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub spawns: Vec<SpawnPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Physics step in seconds.
    pub fixed_dt: f32,
    /// Simulated render frame length in seconds (headless runs have no real clock).
    pub frame_dt: f32,
    /// Collider tag that damages enemies on contact.
    pub hitbox_tag: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            frame_dt: 1.0 / 60.0,
            hitbox_tag: "AttackHitbox".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub position: Vec3,
    pub speed: f32,
    pub radius: f32,
    pub attack_radius: f32,
    /// Seconds an attack hitbox stays in the world.
    pub attack_lifetime: f32,
    /// Seconds between scripted attack presses in headless runs.
    pub attack_interval: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            speed: 5.0,
            radius: 0.5,
            attack_radius: 1.5,
            attack_lifetime: 0.1,
            attack_interval: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub health: i32,
    pub damage_per_hit: i32,
    pub move_speed: f32,
    pub move_delay: f32,
    pub move_length: f32,
    pub is_moving: bool,
    pub radius: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            health: 100,
            damage_per_hit: 10,
            move_speed: 2.0,
            move_delay: 1.0,
            move_length: 0.5,
            is_moving: false,
            radius: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub position: Vec3,
}

impl SimConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.fixed_dt <= 0.0 || self.world.frame_dt <= 0.0 {
            return Err(ConfigError::Invalid(
                "world.fixed_dt and world.frame_dt must be positive".to_string(),
            ));
        }
        if self.world.hitbox_tag.trim().is_empty() {
            return Err(ConfigError::Invalid("world.hitbox_tag is empty".to_string()));
        }
        if self.player.radius < 0.0 || self.player.attack_radius < 0.0 || self.enemy.radius < 0.0
        {
            return Err(ConfigError::Invalid("collider radii must not be negative".to_string()));
        }
        if self.player.attack_interval <= 0.0 {
            return Err(ConfigError::Invalid(
                "player.attack_interval must be positive".to_string(),
            ));
        }
        if self.enemy.health <= 0 {
            return Err(ConfigError::Invalid("enemy.health must be positive".to_string()));
        }
        if self.enemy.damage_per_hit <= 0 {
            return Err(ConfigError::Invalid(
                "enemy.damage_per_hit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SimConfig::from_toml_str("").unwrap();
        assert_eq!(config.enemy.health, 100);
        assert_eq!(config.enemy.damage_per_hit, 10);
        assert_eq!(config.world.hitbox_tag, "AttackHitbox");
        assert!(config.spawns.is_empty());
    }

    #[test]
    fn parses_partial_sections_and_spawns() {
        let toml_content = r#"
[world]
fixed_dt = 0.02

[enemy]
health = 30
is_moving = true

[[spawns]]
position = [4.0, 0.0, 0.0]

[[spawns]]
position = [-4.0, 0.0, 2.0]
        "#;

        let config = SimConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.world.fixed_dt, 0.02);
        assert_eq!(config.world.frame_dt, 1.0 / 60.0);
        assert_eq!(config.enemy.health, 30);
        assert!(config.enemy.is_moving);
        assert_eq!(config.enemy.move_speed, 2.0);
        assert_eq!(config.spawns.len(), 2);
        assert_eq!(config.spawns[1].position, Vec3::new(-4.0, 0.0, 2.0));
    }

    #[test]
    fn rejects_non_positive_timestep() {
        let err = SimConfig::from_toml_str("[world]\nfixed_dt = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_positive_damage() {
        for damage in ["0", "-5", "-2147483648"] {
            let content = format!("[enemy]\ndamage_per_hit = {}\n", damage);
            let err = SimConfig::from_toml_str(&content).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "accepted {}", damage);
        }
    }

    #[test]
    fn rejects_blank_hitbox_tag() {
        let err = SimConfig::from_toml_str("[world]\nhitbox_tag = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SimConfig::from_toml_str("[enemy\nhealth = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_shipped_arena() {
        let config = SimConfig::load_from_file("config/arena.toml").unwrap();
        assert!(!config.spawns.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SimConfig::load_from_file("config/does-not-exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
