// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! 8×8 forward and inverse DCT, AAN fast-butterfly formulation.
//!
//! Separable: a 1-D butterfly is applied to every row, then to every
//! column. Both directions round their output by adding 0.5 and truncating
//! toward zero; this rounding plus quantization is the codec's lossy step.
//! No level shift is applied to the input samples.

use std::sync::OnceLock;

use super::block::Block;

// Forward butterfly rotation constants.
const A1: f64 = 0.707;
const A2: f64 = 0.541;
const A3: f64 = 0.707;
const A4: f64 = 1.307;
const A5: f64 = 0.383;

// Forward output scale factors, in natural frequency order.
const S0: f64 = 0.353553;
const S1: f64 = 0.254898;
const S2: f64 = 0.270598;
const S3: f64 = 0.300672;
const S4: f64 = S0;
const S5: f64 = 0.449988;
const S6: f64 = 0.653281;
const S7: f64 = 1.281458;

/// Inverse butterfly constants, derived from cosines at startup.
struct InverseConsts {
    m1: f64,
    m2: f64,
    m3: f64,
    m4: f64,
    m5: f64,
    s: [f64; 8],
}

fn inverse_consts() -> &'static InverseConsts {
    static CONSTS: OnceLock<InverseConsts> = OnceLock::new();
    CONSTS.get_or_init(|| {
        use std::f64::consts::PI;
        let m0 = 2.0 * (1.0 / 16.0 * 2.0 * PI).cos();
        let m1 = 2.0 * (2.0 / 16.0 * 2.0 * PI).cos();
        let m5 = 2.0 * (3.0 / 16.0 * 2.0 * PI).cos();
        let mut s = [0.0; 8];
        s[0] = 1.0 / 8.0f64.sqrt();
        for (k, entry) in s.iter_mut().enumerate().skip(1) {
            *entry = (k as f64 / 16.0 * PI).cos() / 2.0;
        }
        InverseConsts {
            m1,
            m2: m0 - m5,
            m3: m1,
            m4: m0 + m5,
            m5,
            s,
        }
    })
}

/// One forward 1-D pass over an 8-sample lane.
fn forward_lane(v: [f64; 8]) -> [f64; 8] {
    let b0 = v[0] + v[7];
    let b1 = v[1] + v[6];
    let b2 = v[2] + v[5];
    let b3 = v[3] + v[4];
    let b4 = v[3] - v[4];
    let b5 = v[2] - v[5];
    let b6 = v[1] - v[6];
    let b7 = v[0] - v[7];

    let c0 = b0 + b3;
    let c1 = b1 + b2;
    let c2 = b1 - b2;
    let c3 = b0 - b3;
    let c4 = -b4 - b5;
    let c5 = b5 + b6;
    let c6 = b6 + b7;
    let c7 = b7;

    let d0 = c0 + c1;
    let d1 = c0 - c1;
    let d2 = c2 + c3;
    let d8 = (c4 + c6) * A5;

    let e2 = d2 * A1;
    let e4 = -c4 * A2 - d8;
    let e5 = c5 * A3;
    let e6 = c6 * A4 - d8;

    let f2 = e2 + c3;
    let f3 = c3 - e2;
    let f5 = e5 + c7;
    let f7 = c7 - e5;

    let g4 = e4 + f7;
    let g5 = f5 + e6;
    let g6 = f5 - e6;
    let g7 = f7 - e4;

    let mut out = [0.0; 8];
    out[0] = d0 * S0;
    out[4] = d1 * S4;
    out[2] = f2 * S2;
    out[6] = f3 * S6;
    out[5] = g4 * S5;
    out[1] = g5 * S1;
    out[7] = g6 * S7;
    out[3] = g7 * S3;
    out
}

/// One inverse 1-D pass over an 8-coefficient lane.
fn inverse_lane(v: [f64; 8], k: &InverseConsts) -> [f64; 8] {
    let g0 = v[0] * k.s[0];
    let g1 = v[4] * k.s[4];
    let g2 = v[2] * k.s[2];
    let g3 = v[6] * k.s[6];
    let g4 = v[5] * k.s[5];
    let g5 = v[1] * k.s[1];
    let g6 = v[7] * k.s[7];
    let g7 = v[3] * k.s[3];

    let f4 = g4 - g7;
    let f5 = g5 + g6;
    let f6 = g5 - g6;
    let f7 = g4 + g7;

    let e2 = g2 - g3;
    let e3 = g2 + g3;
    let e5 = f5 - f7;
    let e7 = f5 + f7;
    let e8 = f4 + f6;

    let d2 = e2 * k.m1;
    let d4 = f4 * k.m2;
    let d5 = e5 * k.m3;
    let d6 = f6 * k.m4;
    let d8 = e8 * k.m5;

    let c0 = g0 + g1;
    let c1 = g0 - g1;
    let c2 = d2 - e3;
    let c3 = e3;
    let c4 = d4 + d8;
    let c5 = d5 + e7;
    let c6 = d6 - d8;
    let c7 = e7;
    let c8 = c5 - c6;

    let b0 = c0 + c3;
    let b1 = c1 + c2;
    let b2 = c1 - c2;
    let b3 = c0 - c3;
    let b4 = c4 - c8;
    let b5 = c8;
    let b6 = c6 - c7;
    let b7 = c7;

    [
        b0 + b7,
        b1 + b6,
        b2 + b5,
        b3 + b4,
        b3 - b4,
        b2 - b5,
        b1 - b6,
        b0 - b7,
    ]
}

fn round_trunc(v: f64) -> i32 {
    (v + 0.5) as i32
}

fn apply_separable(block: &Block, lane: impl Fn([f64; 8]) -> [f64; 8]) -> Block {
    let mut comp = [[0.0f64; 8]; 8];
    for i in 0..8 {
        for j in 0..8 {
            comp[i][j] = block[i][j] as f64;
        }
    }
    // Row pass.
    for row in comp.iter_mut() {
        *row = lane(*row);
    }
    // Column pass.
    for j in 0..8 {
        let mut col = [0.0; 8];
        for i in 0..8 {
            col[i] = comp[i][j];
        }
        let col = lane(col);
        for i in 0..8 {
            comp[i][j] = col[i];
        }
    }
    let mut out = [[0i32; 8]; 8];
    for i in 0..8 {
        for j in 0..8 {
            out[i][j] = round_trunc(comp[i][j]);
        }
    }
    out
}

/// Forward DCT of one 8×8 block.
pub fn forward_dct(block: &Block) -> Block {
    apply_separable(block, forward_lane)
}

/// Inverse DCT of one 8×8 block.
pub fn inverse_dct(block: &Block) -> Block {
    let k = inverse_consts();
    apply_separable(block, |lane| inverse_lane(lane, k))
}
