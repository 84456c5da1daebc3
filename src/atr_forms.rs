//! Closed-form all-terminal reliability for graphs of five vertices or
//! fewer. Below this size, enumerating every spanning-connected subset by
//! hand gives an exact polynomial in the edge probabilities; above it there
//! is no known closed form and the recursive engine in [`crate::atr`] takes
//! over. The N=4 and N=5 forms are long but mechanical — each term
//! corresponds to one way the graph's complement edges can fail while
//! leaving it connected.
use crate::graph::UndirectedRandomGraph;

/// Exact ATR for `graph.num_vertexes() <= 5`.
///
/// # Panics
/// If `graph.num_vertexes() > 5`.
pub fn calculate_computable_dimension_graph(graph: &UndirectedRandomGraph) -> f64 {
    match graph.num_vertexes() {
        0 | 1 => 1.0,
        2 => graph.at(0, 1),
        3 => {
            let p12 = graph.at(0, 1);
            let p13 = graph.at(0, 2);
            let p23 = graph.at(1, 2);
            p12 * p13 * p23 + (1.0 - p12) * p13 * p23 + p12 * (1.0 - p13) * p23 + p12 * p13 * (1.0 - p23)
        }
        4 => calculate_four(graph),
        5 => calculate_five(graph),
        n => panic!("calculate_computable_dimension_graph - {n} vertices exceeds the closed-form limit of 5"),
    }
}

fn calculate_four(graph: &UndirectedRandomGraph) -> f64 {
    let _a = 1.0 - graph.at(0, 1);
    let _b = 1.0 - graph.at(1, 2);
    let _c = 1.0 - graph.at(2, 3);
    let _d = 1.0 - graph.at(0, 3);
    let _e = 1.0 - graph.at(1, 3);
    let _f = 1.0 - graph.at(0, 2);

    1.0 - 6.0 * _a * _b * _c * _d * _e * _f
        - _a * _b * _e
        - _a * _d * _f
        - _b * _c * _f
        - _c * _d * _e
        + 2.0
            * (_b * _d * _e * _f * (_a + _c - 0.5)
                + _a * _c * _e * _f * (_b + _d - 0.5)
                + _a * _b * _c * _d * (_e + _f - 0.5))
}

#[allow(clippy::many_single_char_names)]
fn calculate_five(graph: &UndirectedRandomGraph) -> f64 {
    let a = graph.at(0, 1);
    let b = graph.at(0, 2);
    let c = graph.at(0, 3);
    let d = graph.at(0, 4);
    let e = graph.at(1, 2);
    let f = graph.at(1, 3);
    let g = graph.at(1, 4);
    let h = graph.at(2, 3);
    let u = graph.at(2, 4);
    let v = graph.at(3, 4);

    let _a = 1.0 - a;
    let _b = 1.0 - b;
    let _c = 1.0 - c;
    let _d = 1.0 - d;
    let _e = 1.0 - e;
    let _f = 1.0 - f;
    let _g = 1.0 - g;
    let _h = 1.0 - h;
    let _u = 1.0 - u;
    let _v = 1.0 - v;

    let k_1 = 1.0 - _e * (_f * _g + _h * _u);
    let k_2 = 1.0 - _h * (_b * _u + _c * _v);
    let k_3 = 1.0 - _v * (_c * _f + _d * _g);
    let k_4 = 1.0 - _d * (_a * _b + _g * _u);
    let k_5 = 1.0 - _a * (_b * _c + _e * _f);
    let k_6 = a * h * u + a * v * (h * _u + _h * u) + _a * _h * _u * (1.0 - 4.0 * _v);
    let k_7 = c * d * e + e * v * (c * _d + _c * d) + _d * _e * _v;
    let k_8 = a * d * h + g * h * (a * _d + _a * d) + _a * _h * _g;
    let k_9 = a * b * v + e * v * (a * _b + _a * b) + _a * _e * _v;
    let k_10 = e * d * f + d * h * (e * _f + _e * f) + _d * _f * _h;
    let k_11 = b * f * g + b * v * (f * _g + _f * g) + _b * _g * _v;
    let k_12 = c * e * g + c * u * (e * _g + _e * g) + _c * _e * _u;
    let k_13 = b * d * f + f * u * (b * _d + _b * d) + _b * _d * _f;
    let k_14 = b * c * g + g * h * (b * _c + _b * c) + _b * _c * _g;
    let k_15 = a * c * u + f * u * (a * _c + _a * c) + _c * _f * _u;

    1.0 - _b * _c * (_a * _d * k_1 + _f * _e * (_d * _g * k_6 + _u * _v * k_8))
        - _f * _g * (_a * _e * k_2 + _h * _u * (_a * _b * k_7 + _c * _d * k_9))
        - _b * _h * (_e * _u * k_3 + _d * _v * (_a * _f * k_12 + _e * _g * k_15))
        - _c * _v * (_f * _h * k_4 + _a * _g * (_b * _u * k_10 + _e * _h * k_13))
        - _d * _u * (_g * _v * k_5 + _a * _e * (_c * _h * k_11 + _f * _v * k_14))
}
