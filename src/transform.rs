//! Position/rotation/scale with cached matrices.
//!
//! Rotation is stored as Euler angles in radians, applied X then Y then Z.
//! Every setter refreshes the matching component matrix and the combined
//! `translation * rotation * scale` matrix, so reads are always current.

use glam::{EulerRot, Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    translation_matrix: Mat4,
    rotation_matrix: Mat4,
    scale_matrix: Mat4,
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            translation_matrix: Mat4::IDENTITY,
            rotation_matrix: Mat4::IDENTITY,
            scale_matrix: Mat4::IDENTITY,
            matrix: Mat4::IDENTITY,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        let mut transform = Self {
            position,
            rotation,
            scale,
            ..Self::default()
        };
        transform.translation_matrix = Mat4::from_translation(position);
        transform.rotation_matrix = rotation_from_euler(rotation);
        transform.scale_matrix = Mat4::from_scale(scale);
        transform.recompose();
        transform
    }

    /// Rebuild a transform from every stored field, matrices included.
    ///
    /// Used by decoders; the matrices are taken as given.
    pub fn from_parts(
        position: Vec3,
        rotation: Vec3,
        scale: Vec3,
        translation_matrix: Mat4,
        rotation_matrix: Mat4,
        scale_matrix: Mat4,
        matrix: Mat4,
    ) -> Self {
        Self {
            position,
            rotation,
            scale,
            translation_matrix,
            rotation_matrix,
            scale_matrix,
            matrix,
        }
    }

    fn recompose(&mut self) {
        self.matrix = self.translation_matrix * self.rotation_matrix * self.scale_matrix;
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Euler angles in radians.
    #[inline]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Local matrix: translation * rotation * scale.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    #[inline]
    pub fn translation_matrix(&self) -> Mat4 {
        self.translation_matrix
    }

    #[inline]
    pub fn rotation_matrix(&self) -> Mat4 {
        self.rotation_matrix
    }

    #[inline]
    pub fn scale_matrix(&self) -> Mat4 {
        self.scale_matrix
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.translation_matrix = Mat4::from_translation(position);
        self.recompose();
    }

    /// Translate by `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position + delta);
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.rotation_matrix = rotation_from_euler(rotation);
        self.recompose();
    }

    /// Add `delta` radians to each Euler angle.
    pub fn rotate(&mut self, delta: Vec3) {
        self.set_rotation(self.rotation + delta);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.scale_matrix = Mat4::from_scale(scale);
        self.recompose();
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.set_scale(Vec3::splat(scale));
    }
}

fn rotation_from_euler(rotation: Vec3) -> Mat4 {
    Mat4::from_quat(Quat::from_euler(EulerRot::ZYX, rotation.z, rotation.y, rotation.x))
}
