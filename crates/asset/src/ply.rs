//! PLY (Stanford polygon file) decoder producing [`MeshData`].
//!
//! Understands the three standard encodings (`ascii`, `binary_little_endian`,
//! `binary_big_endian`) and the common mesh schema:
//! - `vertex` element with `x`, `y`, `z` and optional `nx/ny/nz`, `u/v` (or `s/t`).
//! - `face` element with a `vertex_indices` (or `vertex_index`) list.
//!
//! Every other element and property is read and discarded so files carrying
//! colors, edges or custom data still decode.

use std::str::SplitAsciiWhitespace;

use thiserror::Error;

use crate::mesh::{MeshData, MeshVertex};

/// Status code reported for a successful decode.
pub const NO_ERROR: u32 = 0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlyError {
    #[error("input is empty")]
    Empty,
    #[error("missing leading 'ply' marker")]
    MissingMagic,
    #[error("header is not terminated by 'end_header'")]
    UnterminatedHeader,
    #[error("malformed header line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },
    #[error("unsupported PLY format '{0}'")]
    UnsupportedFormat(String),
    #[error("unsupported PLY scalar type '{0}'")]
    UnsupportedType(String),
    #[error("file declares no 'vertex' element")]
    MissingVertexElement,
    #[error("vertex element is missing property '{0}'")]
    MissingCoordinate(&'static str),
    #[error("ASCII payload is not valid UTF-8")]
    Encoding,
    #[error("payload ended early while reading element '{element}'")]
    Truncated { element: String },
    #[error("invalid value '{token}' in element '{element}'")]
    InvalidScalar { element: String, token: String },
    #[error("invalid list length {length} in element '{element}'")]
    InvalidListLength { element: String, length: f64 },
    #[error("face {face} references vertex {index}, but only {count} vertices exist")]
    IndexOutOfBounds { face: usize, index: i64, count: usize },
    #[error("mesh has no vertices")]
    NoVertices,
}

impl PlyError {
    /// Non-zero numeric code, stable per variant.
    pub fn code(&self) -> u32 {
        match self {
            Self::Empty => 1,
            Self::MissingMagic => 2,
            Self::UnterminatedHeader => 3,
            Self::MalformedHeader { .. } => 4,
            Self::UnsupportedFormat(_) => 5,
            Self::UnsupportedType(_) => 6,
            Self::MissingVertexElement => 7,
            Self::MissingCoordinate(_) => 8,
            Self::Encoding => 9,
            Self::Truncated { .. } => 10,
            Self::InvalidScalar { .. } => 11,
            Self::InvalidListLength { .. } => 12,
            Self::IndexOutOfBounds { .. } => 13,
            Self::NoVertices => 14,
        }
    }
}

/// Collapses a decode result into its status code (`NO_ERROR` on success).
pub fn error_code<T>(result: &Result<T, PlyError>) -> u32 {
    match result {
        Ok(_) => NO_ERROR,
        Err(err) => err.code(),
    }
}

/// Decode a complete PLY file held in memory.
pub fn decode(bytes: &[u8]) -> Result<MeshData, PlyError> {
    if bytes.is_empty() {
        return Err(PlyError::Empty);
    }

    let (header, payload) = Header::split(bytes)?;
    let mut builder = MeshBuilder::new(&header, payload.len())?;

    match header.format {
        Format::Ascii => {
            let text = std::str::from_utf8(payload).map_err(|_| PlyError::Encoding)?;
            let mut source = AsciiSource {
                tokens: text.split_ascii_whitespace(),
            };
            builder.read_elements(&header, &mut source)?;
        }
        Format::BinaryLittleEndian | Format::BinaryBigEndian => {
            let mut source = BinarySource {
                bytes: payload,
                pos: 0,
                big_endian: header.format == Format::BinaryBigEndian,
            };
            builder.read_elements(&header, &mut source)?;
        }
    }

    let mesh = builder.finish();
    log::debug!(
        "Decoded PLY ({:?}): {} vertices, {} triangles",
        header.format,
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

#[derive(Debug, Clone)]
struct Header {
    format: Format,
    elements: Vec<ElementDef>,
}

#[derive(Debug, Clone)]
struct ElementDef {
    name: String,
    count: usize,
    properties: Vec<PropertyDef>,
}

impl ElementDef {
    fn property(&self, names: &[&str]) -> Option<usize> {
        self.properties
            .iter()
            .position(|p| names.contains(&p.name.as_str()))
    }
}

#[derive(Debug, Clone)]
struct PropertyDef {
    name: String,
    kind: PropertyKind,
}

#[derive(Debug, Clone, Copy)]
enum PropertyKind {
    Scalar(ScalarType),
    List { count: ScalarType, item: ScalarType },
}

impl Header {
    /// Parses the header and returns it together with the payload that follows
    /// the `end_header` line.
    fn split(bytes: &[u8]) -> Result<(Self, &[u8]), PlyError> {
        let mut format = None;
        let mut elements: Vec<ElementDef> = Vec::new();
        let mut start = 0;
        let mut line_no = 0;

        loop {
            if start >= bytes.len() {
                return Err(if line_no == 0 {
                    PlyError::MissingMagic
                } else {
                    PlyError::UnterminatedHeader
                });
            }
            let end = bytes[start..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |offset| start + offset);
            let raw = &bytes[start..end];
            start = (end + 1).min(bytes.len());
            line_no += 1;

            let line = match std::str::from_utf8(raw) {
                Ok(line) => line.trim(),
                // Binary junk before a valid magic line means this is not PLY at all.
                Err(_) if line_no == 1 => return Err(PlyError::MissingMagic),
                Err(_) => {
                    return Err(malformed(line_no, "header line is not valid UTF-8"));
                }
            };

            if line_no == 1 {
                if line != "ply" {
                    return Err(PlyError::MissingMagic);
                }
                continue;
            }

            let mut parts = line.split_whitespace();
            match parts.next() {
                None | Some("comment") | Some("obj_info") => {}
                Some("format") => {
                    let name = parts
                        .next()
                        .ok_or_else(|| malformed(line_no, "missing format name"))?;
                    format = Some(match name {
                        "ascii" => Format::Ascii,
                        "binary_little_endian" => Format::BinaryLittleEndian,
                        "binary_big_endian" => Format::BinaryBigEndian,
                        other => return Err(PlyError::UnsupportedFormat(other.to_string())),
                    });
                }
                Some("element") => {
                    let name = parts
                        .next()
                        .ok_or_else(|| malformed(line_no, "missing element name"))?;
                    let count_str = parts
                        .next()
                        .ok_or_else(|| malformed(line_no, "missing element count"))?;
                    let count = count_str.parse::<usize>().map_err(|_| {
                        malformed(line_no, &format!("invalid element count '{count_str}'"))
                    })?;
                    if elements.iter().any(|e| e.name == name) {
                        return Err(malformed(
                            line_no,
                            &format!("element '{name}' declared twice"),
                        ));
                    }
                    elements.push(ElementDef {
                        name: name.to_string(),
                        count,
                        properties: Vec::new(),
                    });
                }
                Some("property") => {
                    let element = elements
                        .last_mut()
                        .ok_or_else(|| malformed(line_no, "property declared before any element"))?;
                    let property = parse_property(&mut parts, line_no)?;
                    element.properties.push(property);
                }
                Some("end_header") => break,
                Some(other) => {
                    return Err(malformed(line_no, &format!("unknown keyword '{other}'")));
                }
            }
        }

        let format = format.ok_or_else(|| malformed(line_no, "missing format declaration"))?;
        Ok((Self { format, elements }, &bytes[start..]))
    }

    fn element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.name == name)
    }
}

fn parse_property<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<PropertyDef, PlyError> {
    let ty = parts
        .next()
        .ok_or_else(|| malformed(line_no, "missing property type"))?;
    let kind = if ty == "list" {
        let count = parts
            .next()
            .ok_or_else(|| malformed(line_no, "missing list count type"))?;
        let item = parts
            .next()
            .ok_or_else(|| malformed(line_no, "missing list item type"))?;
        PropertyKind::List {
            count: ScalarType::parse(count)?,
            item: ScalarType::parse(item)?,
        }
    } else {
        PropertyKind::Scalar(ScalarType::parse(ty)?)
    };
    let name = parts
        .next()
        .ok_or_else(|| malformed(line_no, "missing property name"))?;
    Ok(PropertyDef {
        name: name.to_string(),
        kind,
    })
}

fn malformed(line: usize, reason: &str) -> PlyError {
    PlyError::MalformedHeader {
        line,
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    fn parse(token: &str) -> Result<Self, PlyError> {
        Ok(match token {
            "char" | "int8" => Self::Char,
            "uchar" | "uint8" => Self::UChar,
            "short" | "int16" => Self::Short,
            "ushort" | "uint16" => Self::UShort,
            "int" | "int32" => Self::Int,
            "uint" | "uint32" => Self::UInt,
            "float" | "float32" => Self::Float,
            "double" | "float64" => Self::Double,
            other => return Err(PlyError::UnsupportedType(other.to_string())),
        })
    }

    fn byte_size(self) -> usize {
        match self {
            Self::Char | Self::UChar => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::UInt | Self::Float => 4,
            Self::Double => 8,
        }
    }

    fn parse_ascii(self, token: &str) -> Option<f64> {
        Some(match self {
            Self::Char => token.parse::<i8>().ok()? as f64,
            Self::UChar => token.parse::<u8>().ok()? as f64,
            Self::Short => token.parse::<i16>().ok()? as f64,
            Self::UShort => token.parse::<u16>().ok()? as f64,
            Self::Int => token.parse::<i32>().ok()? as f64,
            Self::UInt => token.parse::<u32>().ok()? as f64,
            Self::Float => token.parse::<f32>().ok()? as f64,
            Self::Double => token.parse::<f64>().ok()?,
        })
    }

    /// Reads one value from the front of `bytes`; `None` if too short.
    fn read_binary(self, bytes: &[u8], big_endian: bool) -> Option<f64> {
        let raw = bytes.get(..self.byte_size())?;
        macro_rules! read {
            ($ty:ty) => {{
                let array: [u8; std::mem::size_of::<$ty>()] = raw.try_into().ok()?;
                (if big_endian {
                    <$ty>::from_be_bytes(array)
                } else {
                    <$ty>::from_le_bytes(array)
                }) as f64
            }};
        }
        Some(match self {
            Self::Char => read!(i8),
            Self::UChar => read!(u8),
            Self::Short => read!(i16),
            Self::UShort => read!(u16),
            Self::Int => read!(i32),
            Self::UInt => read!(u32),
            Self::Float => read!(f32),
            Self::Double => read!(f64),
        })
    }
}

/// Sequential reader over an element payload.
trait ValueSource {
    fn next_value(&mut self, ty: ScalarType, element: &str) -> Result<f64, PlyError>;
}

struct AsciiSource<'a> {
    tokens: SplitAsciiWhitespace<'a>,
}

impl ValueSource for AsciiSource<'_> {
    fn next_value(&mut self, ty: ScalarType, element: &str) -> Result<f64, PlyError> {
        let token = self.tokens.next().ok_or_else(|| PlyError::Truncated {
            element: element.to_string(),
        })?;
        ty.parse_ascii(token).ok_or_else(|| PlyError::InvalidScalar {
            element: element.to_string(),
            token: token.to_string(),
        })
    }
}

struct BinarySource<'a> {
    bytes: &'a [u8],
    pos: usize,
    big_endian: bool,
}

impl ValueSource for BinarySource<'_> {
    fn next_value(&mut self, ty: ScalarType, element: &str) -> Result<f64, PlyError> {
        let value = self
            .bytes
            .get(self.pos..)
            .and_then(|rest| ty.read_binary(rest, self.big_endian))
            .ok_or_else(|| PlyError::Truncated {
                element: element.to_string(),
            })?;
        self.pos += ty.byte_size();
        Ok(value)
    }
}

/// Property indices of the vertex element that feed [`MeshVertex`].
struct VertexLayout {
    position: [usize; 3],
    normal: Option<[usize; 3]>,
    uv: Option<[usize; 2]>,
}

impl VertexLayout {
    fn resolve(element: &ElementDef) -> Result<Self, PlyError> {
        let require = |name: &'static str| {
            element
                .property(&[name])
                .ok_or(PlyError::MissingCoordinate(name))
        };
        let position = [require("x")?, require("y")?, require("z")?];
        let normal = match (
            element.property(&["nx"]),
            element.property(&["ny"]),
            element.property(&["nz"]),
        ) {
            (Some(x), Some(y), Some(z)) => Some([x, y, z]),
            _ => None,
        };
        let uv = match (
            element.property(&["u", "s", "texture_u"]),
            element.property(&["v", "t", "texture_v"]),
        ) {
            (Some(u), Some(v)) => Some([u, v]),
            _ => None,
        };
        Ok(Self {
            position,
            normal,
            uv,
        })
    }

    fn vertex(&self, values: &[f64]) -> MeshVertex {
        let pick3 = |idx: [usize; 3]| idx.map(|i| values[i] as f32);
        MeshVertex::new(
            pick3(self.position),
            self.normal.map_or(MeshVertex::DEFAULT_NORMAL, pick3),
            self.uv
                .map_or([0.0, 0.0], |[u, v]| [values[u] as f32, values[v] as f32]),
        )
    }
}

struct MeshBuilder {
    layout: VertexLayout,
    vertex_count: usize,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    faces_read: usize,
}

impl MeshBuilder {
    /// Every vertex takes at least one payload byte, so `payload_len` bounds
    /// the preallocation whatever count the header claims.
    fn new(header: &Header, payload_len: usize) -> Result<Self, PlyError> {
        let vertex = header
            .element("vertex")
            .ok_or(PlyError::MissingVertexElement)?;
        let layout = VertexLayout::resolve(vertex)?;
        if vertex.count == 0 {
            return Err(PlyError::NoVertices);
        }
        Ok(Self {
            layout,
            vertex_count: vertex.count,
            vertices: Vec::with_capacity(vertex.count.min(payload_len)),
            indices: Vec::new(),
            faces_read: 0,
        })
    }

    fn read_elements(
        &mut self,
        header: &Header,
        source: &mut impl ValueSource,
    ) -> Result<(), PlyError> {
        let mut scalars: Vec<f64> = Vec::new();
        let mut list: Vec<f64> = Vec::new();

        for element in &header.elements {
            let face_list = if element.name == "face" {
                element
                    .property(&["vertex_indices", "vertex_index"])
                    .filter(|&i| matches!(element.properties[i].kind, PropertyKind::List { .. }))
            } else {
                None
            };

            // Records without properties occupy no bytes.
            if element.properties.is_empty() {
                continue;
            }
            for _ in 0..element.count {
                read_record(element, face_list, source, &mut scalars, &mut list)?;
                match element.name.as_str() {
                    "vertex" => self.vertices.push(self.layout.vertex(&scalars)),
                    "face" if face_list.is_some() => self.push_face(&list)?,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn push_face(&mut self, polygon: &[f64]) -> Result<(), PlyError> {
        let face = self.faces_read;
        self.faces_read += 1;

        let mut resolved = Vec::with_capacity(polygon.len());
        for &raw in polygon {
            let index = raw as i64;
            if index < 0 || index as usize >= self.vertex_count {
                return Err(PlyError::IndexOutOfBounds {
                    face,
                    index,
                    count: self.vertex_count,
                });
            }
            resolved.push(index as u32);
        }

        if resolved.len() < 3 {
            log::trace!("Skipping degenerate face {face} with {} corners", resolved.len());
            return Ok(());
        }
        // Triangulate fan
        for tri in 1..(resolved.len() - 1) {
            self.indices.push(resolved[0]);
            self.indices.push(resolved[tri]);
            self.indices.push(resolved[tri + 1]);
        }
        Ok(())
    }

    fn finish(self) -> MeshData {
        MeshData::new(self.vertices, self.indices)
    }
}

/// Reads one element record. Scalars land in `scalars` by property index
/// (lists leave a `0.0` placeholder); the list at `keep_list` lands in `list`.
fn read_record(
    element: &ElementDef,
    keep_list: Option<usize>,
    source: &mut impl ValueSource,
    scalars: &mut Vec<f64>,
    list: &mut Vec<f64>,
) -> Result<(), PlyError> {
    scalars.clear();
    list.clear();
    for (idx, property) in element.properties.iter().enumerate() {
        match property.kind {
            PropertyKind::Scalar(ty) => scalars.push(source.next_value(ty, &element.name)?),
            PropertyKind::List { count, item } => {
                let length = source.next_value(count, &element.name)?;
                if length < 0.0 || length.fract() != 0.0 {
                    return Err(PlyError::InvalidListLength {
                        element: element.name.clone(),
                        length,
                    });
                }
                let keep = keep_list == Some(idx);
                for _ in 0..length as usize {
                    let value = source.next_value(item, &element.name)?;
                    if keep {
                        list.push(value);
                    }
                }
                scalars.push(0.0);
            }
        }
    }
    Ok(())
}
