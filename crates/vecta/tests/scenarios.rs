use rayon::prelude::*;
use vecta::{
    assert_approx_eq, cross, det, dot, inverse, isa::Native, magnitude, transpose, vec2, vec3,
    vec4, Mat2, Matrix, MatrixExpr, Quat, QuatExpr, SimdQuat, SimdVector, Vec3f, Vector,
    VectorExpr,
};

fn units<T: vecta::Number>() -> [Quat<T>; 4] {
    let (o, l) = (T::ZERO, T::ONE);
    [
        Quat::new(l, o, o, o),
        Quat::new(o, l, o, o),
        Quat::new(o, o, l, o),
        Quat::new(o, o, o, l),
    ]
}

#[test]
fn dot_product() {
    let a = vec4(3, 13, 7, 19);
    let b = vec4(5, 11, 23, 29);
    assert_eq!(dot(a, b), 870);
    assert_eq!(dot(b, a), 870);
    assert_eq!(dot(a * 2, b), 1740);

    let sa = SimdVector::<i32, 4>::from(a);
    assert_eq!(sa.dot(b.into()), 870);
    assert_eq!(dot(sa, b), 870);
}

#[test]
fn cross_product() {
    assert_eq!(cross(vec2(3, 13), vec2(5, 11)), -32);
    assert_eq!(cross(vec2(5, 11), vec2(3, 13)), 32);

    let c = cross(vec3(3.0, 13.0, 7.0), vec3(5.0, 11.0, 23.0)).eval();
    assert_eq!(c, vec3(13.0 * 23.0 - 7.0 * 11.0, 7.0 * 5.0 - 3.0 * 23.0, 3.0 * 11.0 - 13.0 * 5.0));
    assert_eq!(dot(c, vec3(3.0, 13.0, 7.0)), 0.0);

    let s = SimdVector::<f64, 3>::new([3.0, 13.0, 7.0]).cross(SimdVector::new([5.0, 11.0, 23.0]));
    assert_eq!(s.to_vector(), c);
}

#[test]
fn matrices() {
    let a = Matrix::from_rows([[2i32, 3], [5, 7]]);
    let b = Matrix::from_rows([[11i32, 13], [17, 19]]);

    assert_eq!(det(a), -1);
    assert_eq!(det(&a), det(transpose(a)));
    assert_eq!(a * b, Matrix::<i32, 2, 2>::from_rows([[73, 83], [174, 198]]));
    assert_eq!((a * b).width(), 2);
    assert_eq!((a * b).height(), 2);

    let v = a * vec2(1, -1);
    assert_eq!(v.eval(), vec2(-1, -2));

    assert_eq!(Mat2::<i32>::identity() * a, a);
    assert_eq!(-a + a, Mat2::<i32>::ZERO);
}

#[test]
fn hamilton_product() {
    let l = Quat::new(3, 13, 7, 19);
    let r = Quat::new(5, 11, 23, 29);
    let expected = Quat::new(
        3 * 5 - 13 * 11 - 7 * 23 - 19 * 29,
        3 * 11 + 13 * 5 + 7 * 29 - 19 * 23,
        3 * 23 - 13 * 29 + 7 * 5 + 19 * 11,
        3 * 29 + 13 * 23 - 7 * 11 + 19 * 5,
    );
    assert_eq!(l * r, expected);

    let simd = SimdQuat::<i32>::from(l) * SimdQuat::from(r);
    assert_eq!(simd.to_quat(), expected);

    let lf = Quat::new(3.0f32, 13.0, 7.0, 19.0);
    let rf = Quat::new(5.0f32, 11.0, 23.0, 29.0);
    let simd = SimdQuat::<f32>::from(lf) * SimdQuat::from(rf);
    assert_approx_eq!(simd.to_quat(), (lf * rf).eval()).rel(1e-6);
}

#[test]
fn negation() {
    assert_eq!(-vec4(3, 13, 7, 19), vec4(-3, -13, -7, -19));
    assert_eq!(-Quat::new(3, 13, 7, 19), Quat::new(-3, -13, -7, -19));
    assert_eq!(
        (-SimdVector::<f32, 4>::new([3.0, 13.0, 7.0, 19.0])).to_array(),
        [-3.0, -13.0, -7.0, -19.0]
    );
    assert_eq!(
        (-SimdQuat::<f64>::new(3.0, 13.0, 7.0, 19.0)).to_array(),
        [-3.0, -13.0, -7.0, -19.0]
    );
}

#[test]
fn unit_quaternions() {
    let [one, i, j, k] = units::<i64>();
    let neg = |q: Quat<i64>| (-q).eval();
    for (a, b, expected) in [
        (i, i, neg(one)),
        (j, j, neg(one)),
        (k, k, neg(one)),
        (i, j, k),
        (j, k, i),
        (k, i, j),
        (j, i, neg(k)),
        (k, j, neg(i)),
        (i, k, neg(j)),
    ] {
        assert_eq!((a * b).eval(), expected);
    }

    let [one, i, j, k] = units::<f32>().map(|q| SimdQuat::<f32>::from(q));
    assert_eq!(i * j, k);
    assert_eq!(j * k, i);
    assert_eq!(k * i, j);
    assert_eq!(i * i, -one);
    assert_eq!(j * i, -k);
}

#[test]
fn inverse_law() {
    let q = Quat::new(0.5f32, -1.5, 2.0, 0.25);
    assert_approx_eq!((inverse(q) * q).eval(), Quat::IDENTITY).abs(1e-5);
    assert_approx_eq!((q * inverse(q)).eval(), Quat::IDENTITY).abs(1e-5);

    let s = SimdQuat::<f32>::from(q);
    let one = SimdQuat::<f32>::identity();
    assert_approx_eq!(s.inverse() * s, one).abs(1e-5);
    assert_approx_eq!(s * s.inverse(), one).abs(1e-5);
}

#[test]
fn mixed_expressions() {
    let a = vec3(1.0f32, 2.0, 3.0);
    let s = SimdVector::<f32, 3>::new([4.0, 5.0, 6.0]);

    assert_eq!((a + s).eval(), vec3(5.0f32, 7.0, 9.0));
    assert_eq!((a - s).eval(), Vec3f::splat(-3.0));
    assert_eq!(SimdVector::<f32, 3>::from_expr(a * 2.0 - s), SimdVector::new([-2.0f32, -1.0, 0.0]));
    assert_approx_eq!(magnitude(s), 77.0f32.sqrt());

    let q = SimdQuat::<f64>::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!((Quat::new(1.0f64, 0.0, 0.0, 0.0) * q).eval(), q.to_quat());
    assert_eq!(q.w(), 1.0);
}

#[test]
fn native_tag() {
    vecta::init_logger!();
    vecta::host::report();

    assert_eq!(
        format!("{:?}", SimdVector::<f32, 3>::new([1.0, 2.0, 3.0])),
        format!("SimdVector<{}>[1.0, 2.0, 3.0]", <Native as vecta::isa::Isa>::NAME)
    );
}

#[test]
fn parallel_evaluation() {
    let inputs: Vec<(Vector<f64, 4>, Quat<f64>)> = (0..1000)
        .map(|i| {
            let f = i as f64;
            (vec4(f, f + 1.0, -f, 2.0), Quat::new(1.0, f * 0.5, -f, 0.25))
        })
        .collect();

    let sequential: Vec<_> = inputs
        .iter()
        .map(|&(v, q)| (dot(v, v), (q * inverse(q)).eval()))
        .collect();
    let parallel: Vec<_> = inputs
        .par_iter()
        .map(|&(v, q)| {
            let sv = SimdVector::<f64, 4>::from(v);
            let sq = SimdQuat::<f64>::from(q);
            (sv.dot(sv), (sq * sq.inverse()).to_quat())
        })
        .collect();

    for ((d1, q1), (d2, q2)) in sequential.iter().zip(&parallel) {
        assert_approx_eq!(*d1, *d2).rel(1e-12);
        assert_approx_eq!(*q1, *q2).abs(1e-9);
    }
}
