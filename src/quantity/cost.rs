quantity!(
    /// Money in the currency of the price provider.
    Cost, via: f64, suffix: "¤", precision: 3
);
