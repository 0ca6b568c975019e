use crate::{Number, QuatExpr};

macro_rules! unary_node {
    ($(#[$attr:meta])* $name:ident, |$q:ident| [$w:expr, $x:expr, $y:expr, $z:expr]) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<A> {
            a: A,
        }

        impl<A: QuatExpr> $name<A> {
            #[inline]
            pub fn new(a: A) -> Self {
                Self { a }
            }
        }

        impl<A> QuatExpr for $name<A>
        where
            A: QuatExpr,
            A::Elem: Number,
        {
            type Elem = A::Elem;

            #[inline]
            fn w(&self) -> A::Elem {
                let $q = &self.a;
                $w
            }

            #[inline]
            fn x(&self) -> A::Elem {
                let $q = &self.a;
                $x
            }

            #[inline]
            fn y(&self) -> A::Elem {
                let $q = &self.a;
                $y
            }

            #[inline]
            fn z(&self) -> A::Elem {
                let $q = &self.a;
                $z
            }
        }
    };
}

unary_node!(
    /// Component-wise negation of a quaternion expression.
    QuatNeg, |q| [-q.w(), -q.x(), -q.y(), -q.z()]
);

unary_node!(
    /// The conjugate of a quaternion expression, returned by [`conjugate`].
    ///
    /// [`conjugate`]: crate::conjugate
    QuatConj, |q| [q.w(), -q.x(), -q.y(), -q.z()]
);

/// Component-wise sum of two quaternion expressions.
#[derive(Debug, Clone, Copy)]
pub struct QuatAdd<A, B> {
    a: A,
    b: B,
}

impl<A, B> QuatAdd<A, B>
where
    A: QuatExpr,
    B: QuatExpr<Elem = A::Elem>,
{
    #[inline]
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A, B> QuatExpr for QuatAdd<A, B>
where
    A: QuatExpr,
    B: QuatExpr<Elem = A::Elem>,
    A::Elem: Number,
{
    type Elem = A::Elem;

    fn w(&self) -> A::Elem {
        self.a.w() + self.b.w()
    }

    fn x(&self) -> A::Elem {
        self.a.x() + self.b.x()
    }

    fn y(&self) -> A::Elem {
        self.a.y() + self.b.y()
    }

    fn z(&self) -> A::Elem {
        self.a.z() + self.b.z()
    }
}

/// Component-wise difference of two quaternion expressions.
#[derive(Debug, Clone, Copy)]
pub struct QuatSub<A, B> {
    a: A,
    b: B,
}

impl<A, B> QuatSub<A, B>
where
    A: QuatExpr,
    B: QuatExpr<Elem = A::Elem>,
{
    #[inline]
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A, B> QuatExpr for QuatSub<A, B>
where
    A: QuatExpr,
    B: QuatExpr<Elem = A::Elem>,
    A::Elem: Number,
{
    type Elem = A::Elem;

    fn w(&self) -> A::Elem {
        self.a.w() - self.b.w()
    }

    fn x(&self) -> A::Elem {
        self.a.x() - self.b.x()
    }

    fn y(&self) -> A::Elem {
        self.a.y() - self.b.y()
    }

    fn z(&self) -> A::Elem {
        self.a.z() - self.b.z()
    }
}

/// A quaternion expression with every component multiplied by a scalar.
#[derive(Debug, Clone, Copy)]
pub struct QuatMulScalar<A, S> {
    a: A,
    s: S,
}

impl<A, S> QuatMulScalar<A, S>
where
    A: QuatExpr<Elem = S>,
    S: Number,
{
    #[inline]
    pub fn new(a: A, s: S) -> Self {
        Self { a, s }
    }
}

impl<A, S> QuatExpr for QuatMulScalar<A, S>
where
    A: QuatExpr<Elem = S>,
    S: Number,
{
    type Elem = S;

    fn w(&self) -> S {
        self.a.w() * self.s
    }

    fn x(&self) -> S {
        self.a.x() * self.s
    }

    fn y(&self) -> S {
        self.a.y() * self.s
    }

    fn z(&self) -> S {
        self.a.z() * self.s
    }
}

/// A quaternion expression with every component divided by a scalar.
#[derive(Debug, Clone, Copy)]
pub struct QuatDivScalar<A, S> {
    a: A,
    s: S,
}

impl<A, S> QuatDivScalar<A, S>
where
    A: QuatExpr<Elem = S>,
    S: Number,
{
    #[inline]
    pub fn new(a: A, s: S) -> Self {
        Self { a, s }
    }
}

impl<A, S> QuatExpr for QuatDivScalar<A, S>
where
    A: QuatExpr<Elem = S>,
    S: Number,
{
    type Elem = S;

    fn w(&self) -> S {
        self.a.w() / self.s
    }

    fn x(&self) -> S {
        self.a.x() / self.s
    }

    fn y(&self) -> S {
        self.a.y() / self.s
    }

    fn z(&self) -> S {
        self.a.z() / self.s
    }
}

/// The Hamilton product of two quaternion expressions.
///
/// Every component reads all four components of both operands. Chained products re-evaluate
/// their inner products per component, so call [`QuatExpr::eval`] on the intermediate results of
/// long chains.
#[derive(Debug, Clone, Copy)]
pub struct QuatMul<A, B> {
    a: A,
    b: B,
}

impl<A, B> QuatMul<A, B>
where
    A: QuatExpr,
    B: QuatExpr<Elem = A::Elem>,
{
    #[inline]
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A, B> QuatExpr for QuatMul<A, B>
where
    A: QuatExpr,
    B: QuatExpr<Elem = A::Elem>,
    A::Elem: Number,
{
    type Elem = A::Elem;

    fn w(&self) -> A::Elem {
        let (l, r) = (&self.a, &self.b);
        l.w() * r.w() - l.x() * r.x() - l.y() * r.y() - l.z() * r.z()
    }

    fn x(&self) -> A::Elem {
        let (l, r) = (&self.a, &self.b);
        l.w() * r.x() + l.x() * r.w() + l.y() * r.z() - l.z() * r.y()
    }

    fn y(&self) -> A::Elem {
        let (l, r) = (&self.a, &self.b);
        l.w() * r.y() - l.x() * r.z() + l.y() * r.w() + l.z() * r.x()
    }

    fn z(&self) -> A::Elem {
        let (l, r) = (&self.a, &self.b);
        l.w() * r.z() + l.x() * r.y() - l.y() * r.x() + l.z() * r.w()
    }
}

quat_expr_ops! {
    [A] QuatNeg<A>;
    [A] QuatConj<A>;
    [A, B] QuatAdd<A, B>;
    [A, B] QuatSub<A, B>;
    [A, S] QuatMulScalar<A, S>;
    [A, S] QuatDivScalar<A, S>;
    [A, B] QuatMul<A, B>;
}

quat_expr_eq! {
    [A] QuatNeg<A>;
    [A] QuatConj<A>;
    [A, B] QuatAdd<A, B>;
    [A, B] QuatSub<A, B>;
    [A, S] QuatMulScalar<A, S>;
    [A, S] QuatDivScalar<A, S>;
    [A, B] QuatMul<A, B>;
}

#[cfg(test)]
mod tests {
    use crate::{conjugate, Quat, QuatExpr};

    #[test]
    fn nodes() {
        let a = Quat::new(1i32, 2, 3, 4);
        let b = Quat::new(-4i32, 0, 7, 1);
        assert_eq!(a + b, Quat::new(-3, 2, 10, 5));
        assert_eq!(a - b, Quat::new(5, 2, -4, 3));
        assert_eq!(-a, Quat::new(-1, -2, -3, -4));
        assert_eq!(a * 3, Quat::new(3, 6, 9, 12));
        assert_eq!(3 * a, a * 3);
        assert_eq!((a * 4) / 2, a * 2);
        assert_eq!(conjugate(a + b).w(), -3);
        assert_eq!(conjugate(conjugate(&a)), a);
    }

    #[test]
    fn conjugate_reverses_products() {
        let a = Quat::new(2.0f64, -1.0, 0.5, 3.0);
        let b = Quat::new(0.25f64, 4.0, -2.0, 1.0);
        assert_eq!(conjugate(a * b).eval(), (conjugate(b) * conjugate(a)).eval());
    }
}
