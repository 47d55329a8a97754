quantity!(Percentage, suffix: "%", precision: 1);

impl Percentage {
    pub const HUNDRED: Self = Self(100.0);
}
