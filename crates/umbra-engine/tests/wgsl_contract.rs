//! Checks every WGSL module against the binding and vertex contracts the
//! lighting passes are built around.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{
    AddressSpace, Binding, EntryPoint, Interpolation, Module, ShaderStage, TypeInner, VectorSize,
};

use umbra_engine::render::lighting::shaders::{
    composite_module_source, COMPOSITE_WGSL, FULLSCREEN_WGSL, LIGHT_ACCUM_WGSL,
    SHADOW_MASK_WGSL,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Resource {
    Texture,
    Sampler,
    Uniform,
    Other,
}

fn parse_and_validate(src: &str) -> Module {
    let module = naga::front::wgsl::parse_str(src).unwrap_or_else(|e| panic!("{}", e.emit_to_string(src)));
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|e| panic!("validation failed: {e:?}"));
    module
}

fn entry<'m>(module: &'m Module, name: &str) -> &'m EntryPoint {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name)
        .unwrap_or_else(|| panic!("missing entry point {name}"))
}

/// `(location, vector width)` of every vertex input, sorted by location.
fn vertex_inputs(module: &Module, ep: &EntryPoint) -> Vec<(u32, Option<VectorSize>)> {
    let width = |ty: naga::Handle<naga::Type>| match module.types[ty].inner {
        TypeInner::Vector { size, .. } => Some(size),
        _ => None,
    };

    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        match &arg.binding {
            Some(Binding::Location { location, .. }) => out.push((*location, width(arg.ty))),
            Some(_) => {}
            None => {
                if let TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                    for m in members {
                        if let Some(Binding::Location { location, .. }) = &m.binding {
                            out.push((*location, width(m.ty)));
                        }
                    }
                }
            }
        }
    }
    out.sort_by_key(|(loc, _)| *loc);
    out
}

/// `(group, binding, kind)` of every resource, sorted.
fn resources(module: &Module) -> Vec<(u32, u32, Resource)> {
    let mut out: Vec<_> = module
        .global_variables
        .iter()
        .filter_map(|(_, var)| {
            let rb = var.binding.as_ref()?;
            let kind = match var.space {
                AddressSpace::Uniform => Resource::Uniform,
                AddressSpace::Handle => match module.types[var.ty].inner {
                    TypeInner::Image { .. } => Resource::Texture,
                    TypeInner::Sampler { .. } => Resource::Sampler,
                    _ => Resource::Other,
                },
                _ => Resource::Other,
            };
            Some((rb.group, rb.binding, kind))
        })
        .collect();
    out.sort_by_key(|(g, b, _)| (*g, *b));
    out
}

// ── shadow mask ───────────────────────────────────────────────────────────

#[test]
fn shadow_mask_has_vertex_attributes_and_no_bindings() {
    let module = parse_and_validate(SHADOW_MASK_WGSL);

    let vs = entry(&module, "vs_main");
    assert_eq!(vs.stage, ShaderStage::Vertex);
    assert_eq!(
        vertex_inputs(&module, vs),
        vec![(0, Some(VectorSize::Tri)), (1, Some(VectorSize::Bi))]
    );

    assert_eq!(entry(&module, "fs_main").stage, ShaderStage::Fragment);
    assert!(resources(&module).is_empty());
}

#[test]
fn shadow_mask_varying_is_interpolated() {
    let module = parse_and_validate(SHADOW_MASK_WGSL);
    let vs = entry(&module, "vs_main");

    let result = vs.function.result.as_ref().expect("vs_main returns a struct");
    let TypeInner::Struct { members, .. } = &module.types[result.ty].inner else {
        panic!("vs_main output is not a struct");
    };
    let mask = members
        .iter()
        .find(|m| m.name.as_deref() == Some("mask"))
        .expect("mask varying");

    let Some(Binding::Location { interpolation, .. }) = &mask.binding else {
        panic!("mask has no location binding: {:?}", mask.binding);
    };
    assert_eq!(*interpolation, Some(Interpolation::Perspective));
}

// ── light accumulation ────────────────────────────────────────────────────

#[test]
fn light_accum_binds_texture_sampler_uniform() {
    let module = parse_and_validate(LIGHT_ACCUM_WGSL);

    assert_eq!(
        resources(&module),
        vec![
            (0, 0, Resource::Texture),
            (0, 1, Resource::Sampler),
            (0, 2, Resource::Uniform),
        ]
    );

    let vs = entry(&module, "vs_main");
    assert_eq!(
        vertex_inputs(&module, vs),
        vec![(0, Some(VectorSize::Tri)), (1, Some(VectorSize::Bi))]
    );
    assert_eq!(entry(&module, "fs_main").stage, ShaderStage::Fragment);
}

#[test]
fn light_uniform_is_two_vec4s() {
    let module = parse_and_validate(LIGHT_ACCUM_WGSL);
    let (_, light) = module
        .global_variables
        .iter()
        .find(|(_, v)| v.space == AddressSpace::Uniform)
        .expect("uniform block");

    let TypeInner::Struct { members, span } = &module.types[light.ty].inner else {
        panic!("uniform is not a struct");
    };
    assert_eq!(*span as usize, std::mem::size_of::<umbra_engine::lighting::LightUniform>());

    let names: Vec<_> = members.iter().filter_map(|m| m.name.as_deref()).collect();
    assert_eq!(names, vec!["data", "last"]);
    for m in members {
        assert!(matches!(
            module.types[m.ty].inner,
            TypeInner::Vector { size: VectorSize::Quad, .. }
        ));
    }
}

// ── composite ─────────────────────────────────────────────────────────────

#[test]
fn composite_binds_two_texture_sampler_pairs() {
    let module = parse_and_validate(&composite_module_source());

    assert_eq!(
        resources(&module),
        vec![
            (0, 0, Resource::Texture),
            (0, 1, Resource::Sampler),
            (0, 2, Resource::Texture),
            (0, 3, Resource::Sampler),
        ]
    );

    let vs = entry(&module, "vs_fullscreen");
    assert_eq!(vs.stage, ShaderStage::Vertex);
    assert!(vertex_inputs(&module, vs).is_empty());
    assert_eq!(entry(&module, "fs_main").stage, ShaderStage::Fragment);
}

#[test]
fn composite_needs_the_fullscreen_stage() {
    assert!(naga::front::wgsl::parse_str(COMPOSITE_WGSL).is_err());
    parse_and_validate(FULLSCREEN_WGSL);
}
