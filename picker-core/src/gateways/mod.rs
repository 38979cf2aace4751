use std::{fmt, rc::Rc};

pub mod dom;
pub mod geolocation;
pub mod map;
pub mod spawn;

use self::{geolocation::Geolocator, spawn::TaskSpawner};

/// Services of the runtime the picker lives in.
#[derive(Clone)]
pub struct Platform {
    pub geolocator: Rc<dyn Geolocator>,
    pub spawner: Rc<dyn TaskSpawner>,
}

impl Platform {
    pub fn new(geolocator: Rc<dyn Geolocator>, spawner: Rc<dyn TaskSpawner>) -> Self {
        Self {
            geolocator,
            spawner,
        }
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("geolocation_supported", &self.geolocator.is_supported())
            .finish_non_exhaustive()
    }
}
