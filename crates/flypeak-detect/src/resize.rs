use flypeak_core::Heatmap;

/// Bilinear resize of a row-major f32 matrix.
///
/// Half-pixel-center sampling with edge clamping: the source
/// coordinate for destination index `d` is `(d + 0.5) * scale - 0.5`.
/// Resizing to the source dimensions reproduces the input exactly.
pub fn resize_bilinear(
    src: &[f32],
    src_rows: u32,
    src_cols: u32,
    dst_rows: u32,
    dst_cols: u32,
) -> Vec<f32> {
    debug_assert_eq!(src.len(), src_rows as usize * src_cols as usize);
    if dst_rows == 0 || dst_cols == 0 || src_rows == 0 || src_cols == 0 {
        return Vec::new();
    }

    let sw = src_cols as usize;
    let row_scale = src_rows as f32 / dst_rows as f32;
    let col_scale = src_cols as f32 / dst_cols as f32;

    let mut out = Vec::with_capacity(dst_rows as usize * dst_cols as usize);
    for dr in 0..dst_rows {
        let sr = ((dr as f32 + 0.5) * row_scale - 0.5).clamp(0.0, src_rows as f32 - 1.0);
        let r0 = sr.floor() as usize;
        let r1 = (r0 + 1).min(src_rows as usize - 1);
        let fr = sr - r0 as f32;

        for dc in 0..dst_cols {
            let sc = ((dc as f32 + 0.5) * col_scale - 0.5).clamp(0.0, src_cols as f32 - 1.0);
            let c0 = sc.floor() as usize;
            let c1 = (c0 + 1).min(src_cols as usize - 1);
            let fc = sc - c0 as f32;

            let top = src[r0 * sw + c0] * (1.0 - fc) + src[r0 * sw + c1] * fc;
            let bot = src[r1 * sw + c0] * (1.0 - fc) + src[r1 * sw + c1] * fc;
            out.push(top * (1.0 - fr) + bot * fr);
        }
    }
    out
}

/// Resize a heatmap to new dimensions.
pub fn resize_heatmap(map: &Heatmap, rows: u32, cols: u32) -> Heatmap {
    Heatmap::new(
        rows,
        cols,
        resize_bilinear(&map.data, map.rows, map.cols, rows, cols),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_resize_is_exact() {
        let src: Vec<f32> = (0..12).map(|v| v as f32 * 0.25).collect();
        let out = resize_bilinear(&src, 3, 4, 3, 4);
        assert_eq!(out, src);
    }

    #[test]
    fn upsample_interpolates_half_pixel_centers() {
        // 1x2 [0, 1] -> 1x4: samples at source x = -0.25, 0.25, 0.75, 1.25.
        let out = resize_bilinear(&[0.0, 1.0], 1, 2, 1, 4);
        assert_eq!(out, vec![0.0, 0.25, 0.75, 1.0]);
    }

    #[test]
    fn downsample_averages_pairs() {
        let out = resize_bilinear(&[0.0, 2.0, 4.0, 6.0], 1, 4, 1, 2);
        assert_eq!(out, vec![1.0, 5.0]);
    }

    #[test]
    fn resize_is_separable_across_rows() {
        // Constant columns stay constant under vertical resize.
        let src = vec![1.0, 1.0, 3.0, 3.0];
        let out = resize_bilinear(&src, 2, 2, 4, 2);
        assert_eq!(out[0], out[1]);
        assert_eq!(out[6], out[7]);
        assert_eq!(out[0], 1.0);
        assert_eq!(out[6], 3.0);
    }

    #[test]
    fn empty_target_yields_empty() {
        assert!(resize_bilinear(&[1.0], 1, 1, 0, 5).is_empty());
    }
}
