//! Scenario tests for the spin viewer
//!
//! Drive whole viewers through loading, dragging, autoplay and edge clamping
//! the way a host page would.


#[cfg(test)]
pub(crate) mod test_utils {
    use spin360_shared::Size;

    use crate::config::{HostEnv, ViewerConfig};
    use crate::test_utils::{RecordingAdapter, load_all};
    use crate::viewer::Viewer;

    /// Mouse host with a container of the given size.
    pub fn host(width: f64, height: f64) -> HostEnv {
        HostEnv {
            container: Size::new(width, height),
            ..HostEnv::default()
        }
    }

    /// A fully loaded viewer.
    pub fn loaded_viewer(config: &ViewerConfig, host: HostEnv) -> (Viewer, RecordingAdapter) {
        let mut viewer = Viewer::from_config(config, host).unwrap();
        let mut adapter = RecordingAdapter::default();
        load_all(&mut viewer, &mut adapter);
        (viewer, adapter)
    }

    /// Single-row config with `cols` frames.
    pub fn single_row(cols: u32) -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.grid.cols = Some(cols);
        config
    }
}
