#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;

use std::fmt;

use geom::{
    Axis, BezierPath, ConnectionType, ControlPoint, CurveType, FittingType, MeasurementUnit,
    MeshBuffers, PathMeshGenerator, ScaleInputType, SourceMesh, Vec3,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

#[derive(Debug, Serialize)]
struct MeshExport {
    #[serde(flatten)]
    buffers: MeshBuffers,
    repeat_count: usize,
    extrapolated_vertex_count: usize,
    warnings: Vec<String>,
}

/// Host-facing handle around one path and its mesh generator.
///
/// Indices and enum codes coming from the host are checked here; the
/// `geom` layer treats them as preconditions.
#[wasm_bindgen]
pub struct PathEngine {
    path: BezierPath,
    generator: PathMeshGenerator,
}

impl Default for PathEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl PathEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PathEngine {
        PathEngine {
            path: BezierPath::new(),
            generator: PathMeshGenerator::default(),
        }
    }

    #[wasm_bindgen]
    pub fn point_count(&self) -> usize {
        self.path.point_count()
    }

    #[wasm_bindgen]
    pub fn segment_count(&self) -> usize {
        self.path.segment_count()
    }

    #[wasm_bindgen]
    pub fn is_looping(&self) -> bool {
        self.path.is_looping()
    }

    // ───── point set ─────

    /// Append a point past the last one, along its out tangent.
    #[wasm_bindgen]
    pub fn add_point(&mut self) {
        self.path.add_point();
        debug_log!("point added, {} points", self.path.point_count());
    }

    #[wasm_bindgen]
    pub fn add_point_at(&mut self, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        let position = finite_vec3(x, y, z)?;
        self.path.add_point_at(position);
        Ok(())
    }

    /// Split the segment at `t`; returns the index of the new point.
    #[wasm_bindgen]
    pub fn insert_point_at_time(&mut self, t: f64) -> Result<usize, JsValue> {
        if !t.is_finite() {
            return Err(js_error("time must be a finite number"));
        }
        Ok(self.path.insert_point_at_time(t))
    }

    #[wasm_bindgen]
    pub fn remove_point_at(&mut self, index: usize) -> Result<(), JsValue> {
        self.check_index(index)?;
        if self.path.point_count() < 2 {
            return Err(js_error("cannot remove the last remaining point"));
        }
        self.path.remove_point_at(index);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_point_position(&mut self, index: usize, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.check_index(index)?;
        let position = finite_vec3(x, y, z)?;
        self.path.set_position(index, position);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_in_tangent_position(&mut self, index: usize, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.check_index(index)?;
        let position = finite_vec3(x, y, z)?;
        self.path.set_in_tangent_position(index, position);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_out_tangent_position(&mut self, index: usize, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.check_index(index)?;
        let position = finite_vec3(x, y, z)?;
        self.path.set_out_tangent_position(index, position);
        Ok(())
    }

    /// `curve_type`: 0 Auto, 1 Linear, 2 Free.
    #[wasm_bindgen]
    pub fn set_in_curve_type(&mut self, index: usize, curve_type: u8) -> Result<(), JsValue> {
        self.check_index(index)?;
        let curve_type = CurveType::from_index(curve_type).ok_or_else(|| js_error("unknown curve type"))?;
        self.path.set_in_curve_type(index, curve_type);
        Ok(())
    }

    /// `curve_type`: 0 Auto, 1 Linear, 2 Free.
    #[wasm_bindgen]
    pub fn set_out_curve_type(&mut self, index: usize, curve_type: u8) -> Result<(), JsValue> {
        self.check_index(index)?;
        let curve_type = CurveType::from_index(curve_type).ok_or_else(|| js_error("unknown curve type"))?;
        self.path.set_out_curve_type(index, curve_type);
        Ok(())
    }

    /// `connection_type`: 0 Broken, 1 Connected, 2 Mirrored.
    #[wasm_bindgen]
    pub fn set_connection_type(
        &mut self,
        index: usize,
        connection_type: u8,
        adjust_out_to_in: bool,
    ) -> Result<(), JsValue> {
        self.check_index(index)?;
        let connection_type = ConnectionType::from_index(connection_type)
            .ok_or_else(|| js_error("unknown connection type"))?;
        self.path.set_connection_type(index, connection_type, adjust_out_to_in);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_point_roll(&mut self, index: usize, degrees: f64) -> Result<(), JsValue> {
        self.check_index(index)?;
        self.path.set_roll(index, degrees);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_point_scale(&mut self, index: usize, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.check_index(index)?;
        let scale = finite_vec3(x, y, z)?;
        self.path.set_scale(index, scale);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn reset_roll(&mut self) {
        self.path.reset_roll();
    }

    #[wasm_bindgen]
    pub fn reset_scale(&mut self) {
        self.path.reset_scale();
    }

    #[wasm_bindgen]
    pub fn point_position(&self, index: usize) -> Result<Vec<f64>, JsValue> {
        self.check_index(index)?;
        Ok(self.path.position_at_index(index).to_array().to_vec())
    }

    #[wasm_bindgen]
    pub fn in_tangent_position(&self, index: usize) -> Result<Vec<f64>, JsValue> {
        self.check_index(index)?;
        Ok(self.path.in_tangent_position_at_index(index).to_array().to_vec())
    }

    #[wasm_bindgen]
    pub fn out_tangent_position(&self, index: usize) -> Result<Vec<f64>, JsValue> {
        self.check_index(index)?;
        Ok(self.path.out_tangent_position_at_index(index).to_array().to_vec())
    }

    /// Replace all points with already-deserialized control points.
    #[wasm_bindgen]
    pub fn load_points(&mut self, points: JsValue) -> Result<(), JsValue> {
        let points: Vec<ControlPoint> = serde_wasm_bindgen::from_value(points).map_err(to_js_error)?;
        self.path.set_points(points).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn export_points(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.path.points()).map_err(to_js_error)
    }

    // ───── path settings ─────

    #[wasm_bindgen]
    pub fn set_looping(&mut self, looping: bool) {
        self.path.set_looping(looping);
    }

    #[wasm_bindgen]
    pub fn set_path_roll(&mut self, degrees: f64) {
        self.path.set_path_roll(degrees);
    }

    #[wasm_bindgen]
    pub fn set_path_scale(&mut self, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        let scale = finite_vec3(x, y, z)?;
        self.path.set_path_scale(scale);
        Ok(())
    }

    /// `scale_input_type`: 0 Float, 1 Vector2, 2 Vector3.
    #[wasm_bindgen]
    pub fn set_scale_input_type(&mut self, scale_input_type: u8) -> Result<(), JsValue> {
        let scale_input_type = ScaleInputType::from_index(scale_input_type)
            .ok_or_else(|| js_error("unknown scale input type"))?;
        self.path.set_scale_input_type(scale_input_type);
        Ok(())
    }

    // ───── queries ─────

    /// Full frame at `value`, read as a time (`unit` 0) or a distance (`unit` 1).
    #[wasm_bindgen]
    pub fn evaluate(&self, value: f64, unit: u8) -> Result<JsValue, JsValue> {
        let time = self.time_for(value, unit)?;
        let sample = self.path.sample_at_time(time);
        serde_wasm_bindgen::to_value(&sample).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn position_at(&self, value: f64, unit: u8) -> Result<Vec<f64>, JsValue> {
        let time = self.time_for(value, unit)?;
        Ok(self.path.position_at_time(time).to_array().to_vec())
    }

    /// Column-major 4x4 matrix at `value`.
    #[wasm_bindgen]
    pub fn matrix_at(&self, value: f64, unit: u8) -> Result<Vec<f64>, JsValue> {
        let time = self.time_for(value, unit)?;
        Ok(self.path.matrix_at_time(time).to_cols_array().to_vec())
    }

    #[wasm_bindgen]
    pub fn length(&self) -> f64 {
        self.path.length()
    }

    #[wasm_bindgen]
    pub fn distance_to_time(&self, distance: f64) -> f64 {
        self.path.distance_to_time(distance)
    }

    #[wasm_bindgen]
    pub fn time_to_distance(&self, t: f64) -> f64 {
        self.path.time_to_distance(t)
    }

    #[wasm_bindgen]
    pub fn closest_time_to_ray(
        &self,
        origin_x: f64,
        origin_y: f64,
        origin_z: f64,
        direction_x: f64,
        direction_y: f64,
        direction_z: f64,
    ) -> Result<f64, JsValue> {
        let origin = finite_vec3(origin_x, origin_y, origin_z)?;
        let direction = finite_vec3(direction_x, direction_y, direction_z)?;
        Ok(self.path.closest_time_to_ray(origin, direction))
    }

    /// Flat `[x0, y0, z0, x1, ...]` polyline for drawing.
    #[wasm_bindgen]
    pub fn polyline(&self, points_per_segment: usize) -> Vec<f64> {
        self.path
            .sample_polyline(points_per_segment)
            .into_iter()
            .flat_map(Vec3::to_array)
            .collect()
    }

    // ───── mesh generation ─────

    #[wasm_bindgen]
    pub fn set_profile_mesh(&mut self, mesh: JsValue) -> Result<(), JsValue> {
        let mesh: SourceMesh = serde_wasm_bindgen::from_value(mesh).map_err(to_js_error)?;
        self.generator.profile.set_source(Some(mesh)).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn clear_profile_mesh(&mut self) {
        // Clearing never fails validation.
        let _ = self.generator.profile.set_source(None);
    }

    /// `axis`: 0 X, 1 Y, 2 Z.
    #[wasm_bindgen]
    pub fn set_profile_axis(&mut self, axis: u8) -> Result<(), JsValue> {
        let axis = Axis::from_index(axis).ok_or_else(|| js_error("unknown axis"))?;
        self.generator.profile.set_forward_axis(axis);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_profile_flip(&mut self, flip: bool) {
        self.generator.profile.set_flip(flip);
    }

    /// Target submesh per source submesh of the profile.
    #[wasm_bindgen]
    pub fn set_profile_remap(&mut self, indices: Vec<u32>) {
        let indices = indices.into_iter().map(|i| i as usize).collect();
        self.generator.profile.set_remapped_submesh_indices(indices);
    }

    #[wasm_bindgen]
    pub fn profile_remap(&self) -> Vec<u32> {
        self.generator
            .profile
            .remapped_submesh_indices()
            .iter()
            .map(|&i| u32::try_from(i).unwrap_or(u32::MAX))
            .collect()
    }

    #[wasm_bindgen]
    pub fn set_cap_mesh(&mut self, is_end: bool, mesh: JsValue) -> Result<(), JsValue> {
        let mesh: SourceMesh = serde_wasm_bindgen::from_value(mesh).map_err(to_js_error)?;
        self.cap_mut(is_end).profile.set_source(Some(mesh)).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_cap_active(&mut self, is_end: bool, active: bool) {
        self.cap_mut(is_end).active = active;
    }

    #[wasm_bindgen]
    pub fn set_cap_enter_percent(&mut self, is_end: bool, percent: f64) {
        self.cap_mut(is_end).set_enter_percent(percent);
    }

    /// `axis`: 0 X, 1 Y, 2 Z.
    #[wasm_bindgen]
    pub fn set_cap_axis(&mut self, is_end: bool, axis: u8) -> Result<(), JsValue> {
        let axis = Axis::from_index(axis).ok_or_else(|| js_error("unknown axis"))?;
        self.cap_mut(is_end).profile.set_forward_axis(axis);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_cap_flip(&mut self, is_end: bool, flip: bool) {
        self.cap_mut(is_end).profile.set_flip(flip);
    }

    #[wasm_bindgen]
    pub fn set_submesh_names(&mut self, names: Vec<String>) {
        self.generator.submesh_names = names;
    }

    /// `fitting_type`: 0 Length, 1 Count.
    #[wasm_bindgen]
    pub fn set_fitting(&mut self, fitting_type: u8, count: usize, mesh_fitting: f64) -> Result<(), JsValue> {
        let fitting_type = FittingType::from_index(fitting_type).ok_or_else(|| js_error("unknown fitting type"))?;
        if !mesh_fitting.is_finite() {
            return Err(js_error("mesh fitting must be a finite number"));
        }
        let options = &mut self.generator.options;
        options.fitting_type = fitting_type;
        options.count = count;
        options.mesh_fitting = mesh_fitting.clamp(0.0, 1.0);
        Ok(())
    }

    /// Sweep the profile along the path and return packed buffers.
    #[wasm_bindgen]
    pub fn generate_mesh(&mut self) -> Result<JsValue, JsValue> {
        let (mesh, diagnostics) = self.generator.generate(&self.path).map_err(to_js_error)?;
        debug_log!("generated mesh: {}", diagnostics);
        let export = MeshExport {
            buffers: mesh.to_buffers(),
            repeat_count: diagnostics.repeat_count,
            extrapolated_vertex_count: diagnostics.extrapolated_vertex_count,
            warnings: diagnostics.warnings,
        };
        serde_wasm_bindgen::to_value(&export).map_err(to_js_error)
    }
}

impl PathEngine {
    /// Read-only access for Rust hosts.
    #[must_use]
    pub fn path(&self) -> &BezierPath {
        &self.path
    }

    pub fn generator_mut(&mut self) -> &mut PathMeshGenerator {
        &mut self.generator
    }

    fn check_index(&self, index: usize) -> Result<(), JsValue> {
        if index < self.path.point_count() {
            Ok(())
        } else {
            Err(js_error(&format!(
                "point index {index} out of range (0..{})",
                self.path.point_count()
            )))
        }
    }

    fn time_for(&self, value: f64, unit: u8) -> Result<f64, JsValue> {
        if !value.is_finite() {
            return Err(js_error("value must be a finite number"));
        }
        match MeasurementUnit::from_index(unit) {
            Some(MeasurementUnit::Time) => Ok(value),
            Some(MeasurementUnit::Distance) => Ok(self.path.distance_to_time(value)),
            None => Err(js_error("unknown measurement unit")),
        }
    }

    fn cap_mut(&mut self, is_end: bool) -> &mut geom::CapMesh {
        if is_end {
            &mut self.generator.end_cap
        } else {
            &mut self.generator.start_cap
        }
    }
}

fn finite_vec3(x: f64, y: f64, z: f64) -> Result<Vec3, JsValue> {
    let v = Vec3::new(x, y, z);
    if v.is_finite() {
        Ok(v)
    } else {
        Err(js_error("coordinates must be finite numbers"))
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen::JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
