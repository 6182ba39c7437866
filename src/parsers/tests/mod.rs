
pub(super) const BASE: &str = "https://putusan3.mahkamahagung.go.id";
