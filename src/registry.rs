//! Selectable segmentation models and landmark backgrounds.
//!
//! Both tables are addressed by the numeric ids uploads carry, or by name.

use crate::segmentation::types::{Categories, VOC_CATEGORIES};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown model '{0}' (expected 1-3 or quality/balanced/performance)")]
    UnknownModel(String),
    #[error("unknown place '{0}' (expected 1-5 or a landmark name)")]
    UnknownPlace(String),
}

/// Segmentation model choice, trading quality for speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    /// FCN ResNet-50
    Quality,
    /// DeepLabV3 MobileNetV3-Large
    #[default]
    Balanced,
    /// LR-ASPP MobileNetV3-Large
    Performance,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::Quality,
        ModelKind::Balanced,
        ModelKind::Performance,
    ];

    pub fn id(self) -> u32 {
        match self {
            ModelKind::Quality => 1,
            ModelKind::Balanced => 2,
            ModelKind::Performance => 3,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Quality => "quality",
            ModelKind::Balanced => "balanced",
            ModelKind::Performance => "performance",
        }
    }

    pub fn architecture(self) -> &'static str {
        match self {
            ModelKind::Quality => "FCN ResNet-50",
            ModelKind::Balanced => "DeepLabV3 MobileNetV3-Large",
            ModelKind::Performance => "LR-ASPP MobileNetV3-Large",
        }
    }

    /// ONNX export file name inside the models directory
    pub fn file_name(self) -> &'static str {
        match self {
            ModelKind::Quality => "fcn_resnet50.onnx",
            ModelKind::Balanced => "deeplabv3_mobilenet_v3_large.onnx",
            ModelKind::Performance => "lraspp_mobilenet_v3_large.onnx",
        }
    }

    pub fn path_in(self, models_dir: impl AsRef<Path>) -> PathBuf {
        models_dir.as_ref().join(self.file_name())
    }

    /// All three are trained on the Pascal VOC label set
    pub fn categories(self) -> Categories {
        Categories::new(VOC_CATEGORIES)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.architecture())
    }
}

impl FromStr for ModelKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let found = match key.parse::<u32>() {
            Ok(id) => Self::from_id(id),
            Err(_) => Self::ALL.into_iter().find(|kind| kind.name() == key),
        };
        found.ok_or_else(|| RegistryError::UnknownModel(s.to_string()))
    }
}

/// Landmark a photo can be moved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place {
    KoreanWar,
    Haeundae,
    Hallasan,
    Panmunjeom,
    Seokguram,
}

impl Place {
    pub const ALL: [Place; 5] = [
        Place::KoreanWar,
        Place::Haeundae,
        Place::Hallasan,
        Place::Panmunjeom,
        Place::Seokguram,
    ];

    pub fn id(self) -> u32 {
        match self {
            Place::KoreanWar => 1,
            Place::Haeundae => 2,
            Place::Hallasan => 3,
            Place::Panmunjeom => 4,
            Place::Seokguram => 5,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|place| place.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Place::KoreanWar => "6.25",
            Place::Haeundae => "haeundae",
            Place::Hallasan => "hallasan",
            Place::Panmunjeom => "panmunjeom",
            Place::Seokguram => "seokguram",
        }
    }

    /// Background file name inside the backgrounds directory
    pub fn file_name(self) -> &'static str {
        match self {
            Place::KoreanWar => "625.jpg",
            Place::Haeundae => "haeundae.jpg",
            Place::Hallasan => "hanra.png",
            Place::Panmunjeom => "panmunjeom.JPG",
            Place::Seokguram => "seokguram.jpeg",
        }
    }

    pub fn background_path(self, backgrounds_dir: impl AsRef<Path>) -> PathBuf {
        backgrounds_dir.as_ref().join(self.file_name())
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Place {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let found = match key.parse::<u32>() {
            Ok(id) => Self::from_id(id),
            Err(_) => Self::ALL.into_iter().find(|place| place.name() == key),
        };
        found.ok_or_else(|| RegistryError::UnknownPlace(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::types::PERSON;

    #[test]
    fn test_model_kind_parsing() {
        assert_eq!("1".parse::<ModelKind>(), Ok(ModelKind::Quality));
        assert_eq!(" Performance ".parse::<ModelKind>(), Ok(ModelKind::Performance));
        assert_eq!(ModelKind::default(), ModelKind::Balanced);
        assert_eq!(
            "4".parse::<ModelKind>(),
            Err(RegistryError::UnknownModel("4".to_string()))
        );
    }

    #[test]
    fn test_place_parsing() {
        assert_eq!("3".parse::<Place>(), Ok(Place::Hallasan));
        assert_eq!("6.25".parse::<Place>(), Ok(Place::KoreanWar));
        assert_eq!("Seokguram".parse::<Place>(), Ok(Place::Seokguram));
        assert_eq!(
            "0".parse::<Place>(),
            Err(RegistryError::UnknownPlace("0".to_string()))
        );
    }

    #[test]
    fn test_ids_round_trip() {
        for kind in ModelKind::ALL {
            assert_eq!(ModelKind::from_id(kind.id()), Some(kind));
        }
        for place in Place::ALL {
            assert_eq!(Place::from_id(place.id()), Some(place));
        }
    }

    #[test]
    fn test_paths() {
        assert_eq!(
            Place::Panmunjeom.background_path("background_image"),
            PathBuf::from("background_image/panmunjeom.JPG")
        );
        assert_eq!(
            ModelKind::Balanced.path_in("models"),
            PathBuf::from("models/deeplabv3_mobilenet_v3_large.onnx")
        );
    }

    #[test]
    fn test_every_model_has_person() {
        for kind in ModelKind::ALL {
            assert!(kind.categories().index_of(PERSON).is_ok(), "{}", kind);
        }
    }
}
