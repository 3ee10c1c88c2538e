use farmstead::data_structures::texture::check_dimensions;

#[test]
fn should_accept_images_within_the_texture_limit() {
    assert!(check_dimensions((1, 1), 2048).is_ok());
    assert!(check_dimensions((2048, 512), 2048).is_ok());
}

#[test]
fn should_reject_images_above_the_texture_limit() {
    let error = check_dimensions((4096, 4096), 2048).unwrap_err();

    assert!(error.to_string().contains("2048"));
    assert!(check_dimensions((16, 2049), 2048).is_err());
}

#[test]
fn should_reject_empty_images() {
    assert!(check_dimensions((0, 16), 2048).is_err());
    assert!(check_dimensions((16, 0), 2048).is_err());
}
