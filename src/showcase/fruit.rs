use crate::showcase::colour::Colour;

/// Static description of one carousel member.
///
/// `index` is the stable position in the catalogue; loaded models are tagged
/// with it so they can be put back into catalogue order after a concurrent load.
#[derive(Clone, Debug, PartialEq)]
pub struct Fruit {
    pub index: usize,
    pub name: &'static str,
    pub colour: Colour,
    pub path: &'static str,
}

const CATALOGUE: [(&str, &str, &str); 5] = [
    ("bananas", "#fac919", "banana.glb"),
    ("strawberries", "#FF6347", "strawberry.glb"),
    ("pears", "#afc744", "pear.glb"),
    ("oranges", "#FFA500", "orange.glb"),
    ("apples", "#f5795d", "apple.glb"),
];

/// The default fruit line-up, in display order.
pub fn catalogue() -> anyhow::Result<Vec<Fruit>> {
    CATALOGUE
        .iter()
        .enumerate()
        .map(|(index, &(name, hex, path))| {
            Ok(Fruit {
                index,
                name,
                colour: Colour::from_hex(hex)?,
                path,
            })
        })
        .collect()
}
