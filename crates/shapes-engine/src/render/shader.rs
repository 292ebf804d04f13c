//! Shader provider: WGSL vertex/fragment sources linked against an ordered
//! attribute list.
//!
//! Sources are parsed and validated with naga before any GPU object is
//! created, so a broken program fails here with a typed error instead of
//! inside the device.

use thiserror::Error;

/// Vertex entry point every program must define.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment entry point every program must define.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Per-vertex attribute streams a program can consume.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexAttribute {
    Position,
    Color,
    Normal,
    TexCoord,
}

impl VertexAttribute {
    /// Argument name expected on the vertex entry point.
    pub fn name(self) -> &'static str {
        match self {
            VertexAttribute::Position => "position",
            VertexAttribute::Color => "color",
            VertexAttribute::Normal => "normal",
            VertexAttribute::TexCoord => "tex_coord",
        }
    }

    pub fn format(self) -> wgpu::VertexFormat {
        match self {
            VertexAttribute::Position | VertexAttribute::Normal => wgpu::VertexFormat::Float32x3,
            VertexAttribute::Color => wgpu::VertexFormat::Float32x4,
            VertexAttribute::TexCoord => wgpu::VertexFormat::Float32x2,
        }
    }
}

/// Shader text plus the attribute order it is linked with.
///
/// Attribute `i` binds to `@location(i)` of the vertex entry point.
#[derive(Debug, Copy, Clone)]
pub struct ProgramSource<'a> {
    pub label: &'a str,
    pub vertex: &'a str,
    pub fragment: &'a str,
    pub attributes: &'a [VertexAttribute],
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShaderError {
    #[error("{label}: {stage} shader failed to parse:\n{message}")]
    Parse { label: String, stage: &'static str, message: String },

    #[error("{label}: {stage} shader is invalid: {message}")]
    Validation { label: String, stage: &'static str, message: String },

    #[error("{label}: {stage} shader has no `{entry}` entry point")]
    MissingEntryPoint { label: String, stage: &'static str, entry: &'static str },

    #[error("{label}: link failed: {reason}")]
    Link { label: String, reason: String },
}

/// A linked program: one module per stage plus its attribute order.
#[derive(Debug)]
pub struct Program {
    label: String,
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    attributes: Vec<VertexAttribute>,
}

impl Program {
    /// Checks and links `source`, then creates the GPU shader modules.
    pub fn compile(device: &wgpu::Device, source: &ProgramSource<'_>) -> Result<Self, ShaderError> {
        check_program(source)?;

        let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} vertex", source.label)),
            source: wgpu::ShaderSource::Wgsl(source.vertex.into()),
        });
        let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} fragment", source.label)),
            source: wgpu::ShaderSource::Wgsl(source.fragment.into()),
        });

        log::debug!("compiled program `{}`", source.label);
        Ok(Self {
            label: source.label.to_string(),
            vertex,
            fragment,
            attributes: source.attributes.to_vec(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex(&self) -> &wgpu::ShaderModule {
        &self.vertex
    }

    pub fn fragment(&self) -> &wgpu::ShaderModule {
        &self.fragment
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }
}

/// Parses, validates and links a program without touching the GPU.
pub fn check_program(source: &ProgramSource<'_>) -> Result<(), ShaderError> {
    let label = source.label;
    let vs = parse_and_validate(label, "vertex", source.vertex)?;
    let fs = parse_and_validate(label, "fragment", source.fragment)?;

    let vs_entry = find_entry(&vs, naga::ShaderStage::Vertex, VERTEX_ENTRY)
        .ok_or_else(|| missing_entry(label, "vertex", VERTEX_ENTRY))?;
    let fs_entry = find_entry(&fs, naga::ShaderStage::Fragment, FRAGMENT_ENTRY)
        .ok_or_else(|| missing_entry(label, "fragment", FRAGMENT_ENTRY))?;

    // Vertex inputs must match the attribute list slot for slot.
    let mut inputs = Vec::new();
    for arg in &vs_entry.function.arguments {
        collect_locations(&vs, arg.ty, arg.binding.as_ref(), arg.name.as_deref(), &mut inputs);
    }
    for (slot, attr) in source.attributes.iter().enumerate() {
        let found = inputs.iter().find(|(loc, _)| *loc == slot as u32);
        match found {
            Some((_, Some(name))) if name == attr.name() => {}
            Some((_, name)) => {
                return Err(link_error(
                    label,
                    format!(
                        "location {slot} is `{}`, expected attribute `{}`",
                        name.as_deref().unwrap_or("?"),
                        attr.name()
                    ),
                ));
            }
            None => {
                return Err(link_error(
                    label,
                    format!("attribute `{}` is not a vertex input", attr.name()),
                ));
            }
        }
    }
    if let Some((loc, name)) = inputs
        .iter()
        .find(|(loc, _)| *loc as usize >= source.attributes.len())
    {
        return Err(link_error(
            label,
            format!(
                "vertex input `{}` at location {loc} has no attribute",
                name.as_deref().unwrap_or("?")
            ),
        ));
    }

    // Every fragment input must be produced by the vertex stage.
    let mut outputs = Vec::new();
    if let Some(result) = &vs_entry.function.result {
        collect_locations(&vs, result.ty, result.binding.as_ref(), None, &mut outputs);
    }
    let mut varyings = Vec::new();
    for arg in &fs_entry.function.arguments {
        collect_locations(&fs, arg.ty, arg.binding.as_ref(), arg.name.as_deref(), &mut varyings);
    }
    for (loc, name) in &varyings {
        if !outputs.iter().any(|(out, _)| out == loc) {
            return Err(link_error(
                label,
                format!(
                    "fragment input `{}` at location {loc} is not written by the vertex stage",
                    name.as_deref().unwrap_or("?")
                ),
            ));
        }
    }

    Ok(())
}

// ── private helpers ───────────────────────────────────────────────────────

fn parse_and_validate(
    label: &str,
    stage: &'static str,
    text: &str,
) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(text).map_err(|e| ShaderError::Parse {
        label: label.to_string(),
        stage,
        message: e.emit_to_string(text),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| ShaderError::Validation {
        label: label.to_string(),
        stage,
        message: e.to_string(),
    })?;

    Ok(module)
}

fn find_entry<'m>(
    module: &'m naga::Module,
    stage: naga::ShaderStage,
    name: &str,
) -> Option<&'m naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage && ep.name == name)
}

/// Collects `@location` bindings of an argument or result, looking through structs.
fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    name: Option<&str>,
    out: &mut Vec<(u32, Option<String>)>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.push((*location, name.map(str::to_string)));
        }
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                        out.push((*location, member.name.clone()));
                    }
                }
            }
        }
    }
}

fn missing_entry(label: &str, stage: &'static str, entry: &'static str) -> ShaderError {
    ShaderError::MissingEntryPoint { label: label.to_string(), stage, entry }
}

fn link_error(label: &str, reason: String) -> ShaderError {
    ShaderError::Link { label: label.to_string(), reason }
}
