//! Image asset paths. Nothing here touches the network.

use crate::catalog::model::Equipment;
use crate::core::config::GearConfig;

#[derive(Debug, Clone)]
pub struct ImagePaths {
    prefix: String,
}

impl ImagePaths {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &GearConfig) -> Self {
        Self::new(config.image_prefix.clone())
    }

    pub fn character(&self, image: &str) -> Option<String> {
        self.build(image, |prefix, image| format!("{prefix}/character/{image}.PNG"))
    }

    pub fn item(&self, image: &str) -> Option<String> {
        self.build(image, |prefix, image| format!("{prefix}/item/item_{image}.png"))
    }

    pub fn weapon(&self, image: &str) -> Option<String> {
        self.build(image, |prefix, image| format!("{prefix}/weapon/weapon_{image}.png"))
    }

    pub fn set(&self, image: &str) -> Option<String> {
        self.build(image, |prefix, image| format!("{prefix}/set/{image}.PNG"))
    }

    /// Icon for whatever occupies a slot; `None` means render a placeholder
    pub fn thumbnail(&self, equipment: &Equipment) -> Option<String> {
        match equipment {
            Equipment::Item(item) => self.item(&item.raw.image),
            Equipment::Weapon(weapon) => self.weapon(&weapon.image),
        }
    }

    fn build(&self, image: &str, f: impl FnOnce(&str, &str) -> String) -> Option<String> {
        let image = image.trim();
        if image.is_empty() {
            None
        } else {
            Some(f(&self.prefix, image))
        }
    }
}

impl Default for ImagePaths {
    fn default() -> Self {
        Self::from_config(&GearConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Weapon;

    #[test]
    fn test_asset_conventions() {
        let paths = ImagePaths::new("/images/");
        assert_eq!(paths.character("launcher").as_deref(), Some("/images/character/launcher.PNG"));
        assert_eq!(paths.item("1021").as_deref(), Some("/images/item/item_1021.png"));
        assert_eq!(paths.weapon("77").as_deref(), Some("/images/weapon/weapon_77.png"));
        assert_eq!(paths.set("abyss").as_deref(), Some("/images/set/abyss.PNG"));
    }

    #[test]
    fn test_missing_image_is_placeholder() {
        let paths = ImagePaths::default();
        let weapon = Equipment::Weapon(Weapon::default());
        assert_eq!(paths.thumbnail(&weapon), None);
    }
}
