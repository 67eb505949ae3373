#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Desktop,
    Mobile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Landscape,
    Portrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    pub device: Device,
    pub orientation: Orientation,
}

impl Capabilities {
    pub fn is_desktop(&self) -> bool {
        self.device == Device::Desktop
    }

    pub fn is_mobile_portrait(&self) -> bool {
        self.device == Device::Mobile && self.orientation == Orientation::Portrait
    }

    pub fn as_token(&self) -> &'static str {
        match (self.device, self.orientation) {
            (Device::Desktop, _) => "desktop",
            (Device::Mobile, Orientation::Landscape) => "mobile-landscape",
            (Device::Mobile, Orientation::Portrait) => "mobile-portrait",
        }
    }
}

/// One record per supported capability. `resolve` is the single place a
/// capability descriptor turns into concrete layout data; components receive
/// the resolved record, never the table.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTable<T> {
    pub desktop: T,
    pub mobile_landscape: T,
    pub mobile_portrait: T,
}

impl<T> LayoutTable<T> {
    pub fn resolve(&self, capabilities: Capabilities) -> &T {
        match (capabilities.device, capabilities.orientation) {
            (Device::Desktop, _) => &self.desktop,
            (Device::Mobile, Orientation::Landscape) => &self.mobile_landscape,
            (Device::Mobile, Orientation::Portrait) => &self.mobile_portrait,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_covers_every_capability() {
        let table = LayoutTable {
            desktop: "d",
            mobile_landscape: "ml",
            mobile_portrait: "mp",
        };
        let desktop = Capabilities {
            device: Device::Desktop,
            orientation: Orientation::Landscape,
        };
        let desktop_portrait = Capabilities {
            device: Device::Desktop,
            orientation: Orientation::Portrait,
        };
        let mobile_landscape = Capabilities {
            device: Device::Mobile,
            orientation: Orientation::Landscape,
        };
        let mobile_portrait = Capabilities {
            device: Device::Mobile,
            orientation: Orientation::Portrait,
        };

        assert_eq!(*table.resolve(desktop), "d");
        assert_eq!(*table.resolve(desktop_portrait), "d");
        assert_eq!(*table.resolve(mobile_landscape), "ml");
        assert_eq!(*table.resolve(mobile_portrait), "mp");
    }

    #[test]
    fn capability_tokens_are_stable() {
        let mobile_portrait = Capabilities {
            device: Device::Mobile,
            orientation: Orientation::Portrait,
        };
        assert_eq!(mobile_portrait.as_token(), "mobile-portrait");
        assert!(mobile_portrait.is_mobile_portrait());
        assert!(!mobile_portrait.is_desktop());
    }
}
