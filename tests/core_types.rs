use featscan::filter::reflect_index;
use featscan::{FeatScanError, ImageKind, PixelBuffer, Rect, RoiMut, ScalarField};

#[test]
fn buffer_rejects_invalid_dimensions() {
    let err = PixelBuffer::from_gray(Vec::new(), 0, 3).err().unwrap();
    assert_eq!(
        err,
        FeatScanError::InvalidDimensions {
            width: 0,
            height: 3,
        }
    );
}

#[test]
fn buffer_rejects_small_data() {
    let err = PixelBuffer::from_rgb(vec![0u8; 5], 2, 1).err().unwrap();
    assert_eq!(err, FeatScanError::BufferTooSmall { needed: 6, got: 5 });
}

#[test]
fn pixel_access_is_bounds_checked() {
    let mut img = PixelBuffer::new(3, 2, ImageKind::Gray).unwrap();
    img.set_pixel(2, 1, 77).unwrap();
    assert_eq!(img.get_pixel(2, 1).unwrap(), 77);

    let err = img.get_pixel(3, 0).err().unwrap();
    assert_eq!(
        err,
        FeatScanError::OutOfRange {
            x: 3,
            y: 0,
            width: 3,
            height: 2,
        }
    );
    assert!(img.set_pixel(0, 2, 1).is_err());
}

#[test]
fn rgb_pixels_pack_and_convert_to_gray() {
    let img = PixelBuffer::from_rgb(vec![255, 0, 0, 0, 255, 0], 2, 1).unwrap();
    assert_eq!(img.get_pixel(0, 0).unwrap(), 0xFF0000);
    let gray = img.to_gray();
    assert_eq!(gray.kind(), ImageKind::Gray);
    assert_eq!(gray.as_raw(), &[76, 150]);
}

#[test]
fn indexed_buffers_resolve_through_palette() {
    let palette = vec![[0, 0, 0], [0, 0, 255]];
    let img = PixelBuffer::from_indexed(vec![1, 0, 1, 1], 2, 2, palette).unwrap();
    assert_eq!(img.get_pixel(0, 0).unwrap(), 1);
    assert_eq!(img.rgb_at(0, 0).unwrap(), [0, 0, 255]);
    assert_eq!(img.to_gray().as_raw(), &[29, 0, 29, 29]);
}

#[test]
fn roi_translates_and_checks_buffer_extent() {
    let data: Vec<u8> = (0u8..25).collect();
    let img = PixelBuffer::from_gray(data, 5, 5).unwrap();
    let roi = img.roi(Rect::new(3, 3, 4, 4));
    assert_eq!(roi.width(), 4);
    assert_eq!(roi.get_pixel(1, 1).unwrap(), 24);
    // The rectangle reaches past the buffer; the access past it fails.
    assert!(matches!(
        roi.get_pixel(2, 0),
        Err(FeatScanError::OutOfRange { x: 5, y: 3, .. })
    ));
}

#[test]
fn roi_mut_writes_through_to_buffer() {
    let mut img = PixelBuffer::new(4, 4, ImageKind::Gray).unwrap();
    {
        let mut roi = RoiMut::new(&mut img, Rect::new(1, 2, 2, 2));
        roi.set_pixel(0, 0, 300).unwrap();
        assert_eq!(roi.as_roi().get_pixel(0, 0).unwrap(), 255);
    }
    assert_eq!(img.get_pixel(1, 2).unwrap(), 255);
}

#[test]
fn overlap_is_inclusive_and_symmetric() {
    let a = Rect::new(10, 10, 5, 5);
    let touching = Rect::new(15, 12, 3, 3);
    let apart = Rect::new(16, 12, 3, 3);
    assert!(a.overlaps(&touching) && touching.overlaps(&a));
    assert!(!a.overlaps(&apart) && !apart.overlaps(&a));

    let img = PixelBuffer::new(32, 32, ImageKind::Gray).unwrap();
    assert!(img.roi(a).overlaps(&img.roi(touching)));
}

#[test]
fn crossing_rectangles_overlap() {
    // Neither rectangle has a corner inside the other.
    let wide = Rect::new(0, 10, 30, 4);
    let tall = Rect::new(12, 0, 4, 30);
    assert!(wide.overlaps(&tall) && tall.overlaps(&wide));
}

#[test]
fn reflection_stays_in_range() {
    assert_eq!(reflect_index(-1, 1), 0);
    assert_eq!(reflect_index(5, 1), 0);
    assert_eq!(reflect_index(-2, 5), 2);
    assert_eq!(reflect_index(5, 5), 4);
    assert_eq!(reflect_index(6, 5), 3);
    for i in -20isize..20 {
        assert!(reflect_index(i, 3) < 3);
    }
}

#[test]
fn scalar_field_requires_exact_length() {
    assert!(ScalarField::from_vec(vec![0.0; 6], 3, 2).is_ok());
    assert!(ScalarField::from_vec(vec![0.0; 5], 3, 2).is_err());
}
