//! Vector and matrix types for the render pipeline.
//!
//! Everything here follows the row-vector convention: a vector is a row,
//! transforms apply as `v' = v * M` and the translation lives in row 3.
//! Matrices are stored row-major, so uniform uploads pass `transpose = true`.

use std::f32::consts::PI;

/// 2D vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn mag(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit-length copy. The vector must not be zero; see [`Vec2::try_normal`].
    pub fn normal(self) -> Vec2 {
        let m = self.mag();
        Vec2::new(self.x / m, self.y / m)
    }

    /// Unit-length copy, or `None` for the zero vector.
    pub fn try_normal(self) -> Option<Vec2> {
        let m = self.mag();
        if m == 0.0 {
            None
        } else {
            Some(Vec2::new(self.x / m, self.y / m))
        }
    }

    pub fn normalize(&mut self) {
        let m = self.mag();
        self.x /= m;
        self.y /= m;
    }

    pub fn dot(self, v: Vec2) -> f32 {
        self.x * v.x + self.y * v.y
    }

    /// Z component of the 3D cross product; the sign tells which side of
    /// `self` the other vector lies on.
    pub fn cross(self, v: Vec2) -> f32 {
        self.x * v.y - self.y * v.x
    }

    pub fn add(self, v: Vec2) -> Vec2 {
        Vec2::new(self.x + v.x, self.y + v.y)
    }

    pub fn sub(self, v: Vec2) -> Vec2 {
        Vec2::new(self.x - v.x, self.y - v.y)
    }

    pub fn scale(self, f: f32) -> Vec2 {
        Vec2::new(self.x * f, self.y * f)
    }

    pub fn div(self, f: f32) -> Vec2 {
        Vec2::new(self.x / f, self.y / f)
    }
}

/// 3D vector with a homogeneous `w` component.
///
/// `w` is 1 for points and 0 for directions. Arithmetic keeps the left
/// operand's `w`; only [`Vec3::mul_mat4`] recomputes it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Vec3 {
    fn default() -> Self {
        Vec3::new(0.0, 0.0, 0.0)
    }
}

impl Vec3 {
    /// Point constructor, `w = 1`.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    /// Constructor with an explicit `w`; use `w = 0` for directions.
    pub fn with_w(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn mag(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit-length copy, `w` untouched. The vector must not be zero; see
    /// [`Vec3::try_normal`].
    pub fn normal(self) -> Vec3 {
        let m = self.mag();
        Vec3::with_w(self.x / m, self.y / m, self.z / m, self.w)
    }

    /// Unit-length copy, or `None` for the zero vector. `w` is untouched.
    pub fn try_normal(self) -> Option<Vec3> {
        let m = self.mag();
        if m == 0.0 {
            None
        } else {
            Some(Vec3::with_w(self.x / m, self.y / m, self.z / m, self.w))
        }
    }

    /// In-place [`Vec3::normal`].
    pub fn normalize(&mut self) {
        let m = self.mag();
        self.x /= m;
        self.y /= m;
        self.z /= m;
    }

    /// 3-space dot product, `w` ignored.
    pub fn dot(self, v: Vec3) -> f32 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// 3-space cross product. Keeps `self.w`.
    pub fn cross(self, v: Vec3) -> Vec3 {
        Vec3::with_w(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
            self.w,
        )
    }

    pub fn add(self, v: Vec3) -> Vec3 {
        Vec3::with_w(self.x + v.x, self.y + v.y, self.z + v.z, self.w)
    }

    pub fn sub(self, v: Vec3) -> Vec3 {
        Vec3::with_w(self.x - v.x, self.y - v.y, self.z - v.z, self.w)
    }

    pub fn scale(self, f: f32) -> Vec3 {
        Vec3::with_w(self.x * f, self.y * f, self.z * f, self.w)
    }

    pub fn div(self, f: f32) -> Vec3 {
        Vec3::with_w(self.x / f, self.y / f, self.z / f, self.w)
    }

    /// Full homogeneous transform. Recomputes `w` and applies the
    /// perspective divide to x, y and z when the new `w` is non-zero.
    pub fn mul_mat4(self, m: &Mat4x4) -> Vec3 {
        let mut v = Vec3::with_w(
            self.x * m.m[0][0] + self.y * m.m[1][0] + self.z * m.m[2][0] + self.w * m.m[3][0],
            self.x * m.m[0][1] + self.y * m.m[1][1] + self.z * m.m[2][1] + self.w * m.m[3][1],
            self.x * m.m[0][2] + self.y * m.m[1][2] + self.z * m.m[2][2] + self.w * m.m[3][2],
            self.x * m.m[0][3] + self.y * m.m[1][3] + self.z * m.m[2][3] + self.w * m.m[3][3],
        );
        if v.w != 0.0 {
            v.x /= v.w;
            v.y /= v.w;
            v.z /= v.w;
        }
        v
    }
}

/// Row-major 4x4 matrix. The default value is all zeros, not identity.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4x4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4x4 {
    pub fn identity() -> Self {
        let mut m = Mat4x4::default();
        m.m[0][0] = 1.0;
        m.m[1][1] = 1.0;
        m.m[2][2] = 1.0;
        m.m[3][3] = 1.0;
        m
    }

    /// Standard matrix product. Composes left to right under the row-vector
    /// convention: `v * a.mul(&b)` applies `a` first, then `b`.
    pub fn mul(&self, other: &Mat4x4) -> Mat4x4 {
        let mut out = Mat4x4::default();
        for j in 0..4 {
            for i in 0..4 {
                out.m[j][i] = self.m[j][0] * other.m[0][i]
                    + self.m[j][1] * other.m[1][i]
                    + self.m[j][2] * other.m[2][i]
                    + self.m[j][3] * other.m[3][i];
            }
        }
        out
    }

    pub fn transposed(&self) -> Mat4x4 {
        let mut out = Mat4x4::default();
        for j in 0..4 {
            for i in 0..4 {
                out.m[j][i] = self.m[i][j];
            }
        }
        out
    }

    /// Flat row-major view for uniform upload with `transpose = true`.
    pub fn as_flat(&self) -> &[f32; 16] {
        bytemuck::cast_ref(self)
    }
}

pub fn matrix_scale(sx: f32, sy: f32, sz: f32) -> Mat4x4 {
    let mut m = Mat4x4::default();
    m.m[0][0] = sx;
    m.m[1][1] = sy;
    m.m[2][2] = sz;
    m.m[3][3] = 1.0;
    m
}

/// Combined translation and rotation. `u`, `v` and `w` are angles in radians
/// around the x, y and z axes; the entries are the expanded product of the
/// three rotation matrices, with the translation in row 3.
pub fn matrix_transform(x: f32, y: f32, z: f32, u: f32, v: f32, w: f32) -> Mat4x4 {
    let (su, cu) = (u.sin(), u.cos());
    let (sv, cv) = (v.sin(), v.cos());
    let (sw, cw) = (w.sin(), w.cos());

    let mut m = Mat4x4::default();
    m.m[0][0] = cv * cw;
    m.m[0][1] = cv * sw;
    m.m[0][2] = sv;
    m.m[1][0] = (su * -sv) * cw + cu * -sw;
    m.m[1][1] = (su * -sv) * sw + cu * cw;
    m.m[1][2] = su * cv;
    m.m[2][0] = (cu * -sv) * cw + (-su * -sw);
    m.m[2][1] = (cu * -sv) * sw + (-su * cw);
    m.m[2][2] = cu * cv;
    m.m[3][0] = x;
    m.m[3][1] = y;
    m.m[3][2] = z;
    m.m[3][3] = 1.0;
    m
}

/// Perspective projection from a symmetric frustum. `fov_degrees` is the
/// vertical field of view; `near`/`far` are distances to the clip planes.
/// Visible eye-space points have negative z.
pub fn matrix_project(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4x4 {
    let fov_radians = fov_degrees * (PI / 180.0);
    let tan_half_fov = (fov_radians / 2.0).tan();

    let t = tan_half_fov * near;
    let b = -t;
    let r = t * aspect;
    let l = -r;

    let mut m = Mat4x4::default();
    m.m[0][0] = (2.0 * near) / (r - l);
    m.m[1][1] = (2.0 * near) / (t - b);
    m.m[2][0] = (r + l) / (r - l);
    m.m[2][1] = (t + b) / (t - b);
    m.m[2][2] = -(far + near) / (far - near);
    m.m[2][3] = -1.0;
    m.m[3][2] = -(2.0 * far * near) / (far - near);
    m
}

/// Rotation plus position that points the z axis along `target`. `target`
/// is a unit forward direction and `up` an approximate up; the rows are the
/// re-orthogonalized right/up/forward basis with `pos` in row 3.
pub fn matrix_point_at(pos: Vec3, target: Vec3, up: Vec3) -> Mat4x4 {
    let a = target.scale(up.dot(target));
    let new_up = up.sub(a).normal();
    let new_right = new_up.cross(target);

    let mut m = Mat4x4::default();
    m.m[0][0] = new_right.x;
    m.m[0][1] = new_right.y;
    m.m[0][2] = new_right.z;
    m.m[1][0] = new_up.x;
    m.m[1][1] = new_up.y;
    m.m[1][2] = new_up.z;
    m.m[2][0] = target.x;
    m.m[2][1] = target.y;
    m.m[2][2] = target.z;
    m.m[3][0] = pos.x;
    m.m[3][1] = pos.y;
    m.m[3][2] = pos.z;
    m.m[3][3] = 1.0;
    m
}

/// Inverse of a point-at matrix: moves the world so the camera sits at the
/// origin looking down its own z axis. The 3x3 block of `m` must be
/// orthonormal (any [`matrix_point_at`] output is); this is not validated.
pub fn matrix_view(m: &Mat4x4) -> Mat4x4 {
    let mut m2 = Mat4x4::default();
    for j in 0..3 {
        for i in 0..3 {
            m2.m[j][i] = m.m[i][j];
        }
    }
    for i in 0..3 {
        m2.m[3][i] = -(m.m[3][0] * m2.m[0][i] + m.m[3][1] * m2.m[1][i] + m.m[3][2] * m2.m[2][i]);
    }
    m2.m[3][3] = 1.0;
    m2
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_near(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() < eps, "{a} vs {b}");
    }

    fn assert_mat_near(a: &Mat4x4, b: &Mat4x4, eps: f32) {
        for j in 0..4 {
            for i in 0..4 {
                assert!(
                    (a.m[j][i] - b.m[j][i]).abs() < eps,
                    "entry [{j}][{i}]: {} vs {}",
                    a.m[j][i],
                    b.m[j][i]
                );
            }
        }
    }

    #[test]
    fn default_matrix_is_all_zeros() {
        let m = Mat4x4::default();
        for j in 0..4 {
            for i in 0..4 {
                assert_eq!(m.m[j][i], 0.0);
            }
        }
    }

    #[test]
    fn identity_leaves_points_alone() {
        let v = Vec3::new(1.5, -2.0, 3.25);
        let r = v.mul_mat4(&Mat4x4::identity());
        assert_near(r.x, v.x, EPS);
        assert_near(r.y, v.y, EPS);
        assert_near(r.z, v.z, EPS);
        assert_eq!(r.w, 1.0);
    }

    #[test]
    fn normal_has_unit_magnitude() {
        let v = Vec3::new(3.0, -4.0, 12.0);
        assert_near(v.normal().mag(), 1.0, EPS);
        let v2 = Vec2::new(3.0, 4.0);
        assert_near(v2.mag(), 5.0, EPS);
        assert_near(v2.normal().mag(), 1.0, EPS);
    }

    #[test]
    fn try_normal_rejects_zero_vectors() {
        assert!(Vec3::new(0.0, 0.0, 0.0).try_normal().is_none());
        assert!(Vec2::new(0.0, 0.0).try_normal().is_none());
        let n = Vec3::new(0.0, 5.0, 0.0).try_normal().unwrap();
        assert_near(n.y, 1.0, EPS);
    }

    #[test]
    fn normalize_in_place_keeps_w() {
        let mut v = Vec3::with_w(0.0, 3.0, 4.0, 0.0);
        v.normalize();
        assert_near(v.mag(), 1.0, EPS);
        assert_eq!(v.w, 0.0);
    }

    #[test]
    fn arithmetic_keeps_left_operand_w() {
        let a = Vec3::with_w(1.0, 2.0, 3.0, 5.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a.add(b).w, 5.0);
        assert_eq!(a.sub(b).w, 5.0);
        assert_eq!(a.scale(2.0).w, 5.0);
        assert_eq!(a.div(2.0).w, 5.0);
        assert_eq!(a.cross(b).w, 5.0);
        assert_eq!(b.add(a).w, 1.0);
    }

    #[test]
    fn cross_of_x_and_y_is_z() {
        let c = Vec3::new(1.0, 0.0, 0.0).cross(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!((c.x, c.y, c.z), (0.0, 0.0, 1.0));
    }

    #[test]
    fn vec2_cross_sign_flips_with_order() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        assert_eq!(a.cross(b), 1.0);
        assert_eq!(b.cross(a), -1.0);
    }

    #[test]
    fn scale_matrix_scales_points() {
        let v = Vec3::new(1.0, 0.0, 0.0).mul_mat4(&matrix_scale(2.0, 2.0, 2.0));
        assert_near(v.x, 2.0, EPS);
        assert_near(v.y, 0.0, EPS);
        assert_near(v.z, 0.0, EPS);
        assert_eq!(v.w, 1.0);
    }

    #[test]
    fn points_translate_and_directions_do_not() {
        let m = matrix_transform(5.0, 6.0, 7.0, 0.0, 0.0, 0.0);
        let p = Vec3::new(1.0, 0.0, 0.0).mul_mat4(&m);
        assert_near(p.x, 6.0, EPS);
        assert_near(p.y, 6.0, EPS);
        assert_near(p.z, 7.0, EPS);
        let d = Vec3::with_w(1.0, 0.0, 0.0, 0.0).mul_mat4(&m);
        assert_near(d.x, 1.0, EPS);
        assert_near(d.y, 0.0, EPS);
        assert_near(d.z, 0.0, EPS);
        assert_eq!(d.w, 0.0);
    }

    #[test]
    fn perspective_divide_runs_only_for_nonzero_w() {
        let m = matrix_project(90.0, 1.0, 0.1, 100.0);
        let p = Vec3::new(0.3, -0.2, -2.0).mul_mat4(&m);
        assert_near(p.w, 2.0, 1e-4);
        assert_near(p.x, 0.15, 1e-4);

        let d = Vec3::with_w(0.3, -0.2, 0.0, 0.0).mul_mat4(&m);
        assert_eq!(d.w, 0.0);
        assert_near(d.x, 0.3, 1e-4);
    }

    #[test]
    fn projection_keeps_perspective_structure() {
        for (fov, aspect, near, far) in [
            (90.0, 16.0 / 9.0, 0.1, 100.0),
            (45.0, 1.0, 0.5, 10.0),
            (120.0, 0.75, 1.0, 2000.0),
        ] {
            let m = matrix_project(fov, aspect, near, far);
            assert_eq!(m.m[2][3], -1.0);
            assert_eq!(m.m[3][3], 0.0);
        }
    }

    #[test]
    fn transform_closed_form_matches_rotation_product() {
        let (x, y, z) = (1.5, -2.0, 3.0);
        let (u, v, w) = (0.4, 0.9, -1.3);
        let ru = matrix_transform(0.0, 0.0, 0.0, u, 0.0, 0.0);
        let rv = matrix_transform(0.0, 0.0, 0.0, 0.0, v, 0.0);
        let rw = matrix_transform(0.0, 0.0, 0.0, 0.0, 0.0, w);
        let tr = matrix_transform(x, y, z, 0.0, 0.0, 0.0);
        let product = ru.mul(&rv).mul(&rw).mul(&tr);
        assert_mat_near(&product, &matrix_transform(x, y, z, u, v, w), EPS);
    }

    #[test]
    fn view_of_transform_inverts_it() {
        let m = matrix_transform(1.5, -2.0, 3.0, 0.4, 0.9, -1.3);
        let inv = matrix_view(&m);
        assert_mat_near(&m.mul(&inv), &Mat4x4::identity(), 1e-4);
        assert_mat_near(&inv.mul(&m), &Mat4x4::identity(), 1e-4);
    }

    #[test]
    fn view_of_point_at_moves_camera_to_origin() {
        let pos = Vec3::new(2.0, 3.0, -5.0);
        let target = Vec3::new(0.3, -0.2, 0.9).normal();
        let up = Vec3::new(0.0, 1.0, 0.0);
        let view = matrix_view(&matrix_point_at(pos, target, up));
        let r = pos.mul_mat4(&view);
        assert_near(r.x, 0.0, 1e-4);
        assert_near(r.y, 0.0, 1e-4);
        assert_near(r.z, 0.0, 1e-4);
    }

    #[test]
    fn point_at_canonical_basis_is_pure_translation() {
        let m = matrix_point_at(
            Vec3::new(2.0, 3.0, 4.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert_mat_near(&m, &matrix_transform(2.0, 3.0, 4.0, 0.0, 0.0, 0.0), EPS);
    }

    #[test]
    fn transpose_round_trips() {
        let m = matrix_transform(1.0, 2.0, 3.0, 0.5, 0.25, 0.125);
        assert_eq!(m.transposed().transposed(), m);
        assert_eq!(m.transposed().m[0][2], m.m[2][0]);
    }

    #[test]
    fn as_flat_walks_rows_first() {
        let mut m = Mat4x4::default();
        m.m[0][1] = 2.0;
        m.m[3][0] = 7.0;
        let flat = m.as_flat();
        assert_eq!(flat[1], 2.0);
        assert_eq!(flat[12], 7.0);
    }
}
