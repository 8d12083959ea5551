use fruit_carousel::{data_structures::texture::base_colour_texel, resources::parse_gltf};

/// Wrap a glTF JSON document into a GLB container without a binary chunk.
fn glb(json: &str) -> Vec<u8> {
    let mut chunk = json.as_bytes().to_vec();
    while chunk.len() % 4 != 0 {
        chunk.push(b' ');
    }
    let length = 12 + 8 + chunk.len() as u32;

    let mut bytes = Vec::with_capacity(length as usize);
    bytes.extend_from_slice(b"glTF");
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b"JSON");
    bytes.extend_from_slice(&chunk);
    bytes
}

#[test]
fn should_parse_a_minimal_glb() {
    let gltf = parse_gltf("empty.glb", &glb(r#"{"asset":{"version":"2.0"}}"#)).unwrap();
    assert_eq!(gltf.meshes().count(), 0);
    assert!(gltf.blob.is_none());
}

#[test]
fn should_reject_draco_compressed_meshes() {
    let bytes = glb(
        r#"{
            "asset": {"version": "2.0"},
            "extensionsUsed": ["KHR_draco_mesh_compression"],
            "extensionsRequired": ["KHR_draco_mesh_compression"]
        }"#,
    );
    let err = parse_gltf("banana.glb", &bytes).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("banana.glb"), "{message}");
    assert!(message.contains("KHR_draco_mesh_compression"), "{message}");
}

#[test]
fn should_reject_other_unsupported_required_extensions() {
    let bytes = glb(
        r#"{
            "asset": {"version": "2.0"},
            "extensionsUsed": ["EXT_made_up"],
            "extensionsRequired": ["EXT_made_up"]
        }"#,
    );
    let err = parse_gltf("pear.glb", &bytes).unwrap_err();
    assert!(format!("{err:#}").contains("not a valid glTF file"));
}

#[test]
fn should_reject_garbage() {
    assert!(parse_gltf("apple.glb", b"glTF\x02\0\0\0").is_err());
    assert!(parse_gltf("apple.glb", b"").is_err());
}

#[test]
fn should_turn_base_colour_factors_into_texels() {
    assert_eq!(base_colour_texel([1.0, 1.0, 1.0, 1.0]), [255, 255, 255, 255]);
    assert_eq!(base_colour_texel([0.0, 0.5, 1.0, 1.0]), [0, 128, 255, 255]);
    assert_eq!(base_colour_texel([-1.0, 2.0, 0.2, 0.0]), [0, 255, 51, 0]);
}
