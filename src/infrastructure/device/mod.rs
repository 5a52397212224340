pub mod simulated;

pub use simulated::SimulatedDeviceController;
