use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Generics, LitStr, parse_macro_input, parse_quote};

/// Derive the `Persist` field walk for a struct.
///
/// Fields are written and read in declaration order. Every persisted field's
/// type must implement `FieldCodec`. Generic structs get a `FieldCodec` bound
/// per persisted field type and a `'static` bound per type parameter.
/// Lifetime parameters are rejected.
///
/// # Attributes
///
/// Container level, inside `#[persist(...)]`:
///
/// - `path = "game::Door"`: type path recorded in saved actor proxies.
///   Defaults to `module_path!()::StructName`.
/// - `post_load`: the type implements `PostLoad`; restore calls it.
/// - `save_listener`: the type implements `SaveListener`.
/// - `new_game_listener`: the type implements `NewGameListener`.
/// - `controllable`: the type implements `Controllable`. Needs a `core` field.
///
/// Field level:
///
/// - `#[persist(skip)]` leaves the field out of the stream.
/// - `#[persist(core)]` marks the `ActorCore` field. It is left out of the
///   stream, reports destruction, and an `Actor` impl is generated around it.
///
/// ```ignore
/// #[derive(Default, Persist)]
/// #[persist(path = "game::Chest", post_load)]
/// struct Chest {
///     #[persist(core)]
///     core: ActorCore,
///     gold: u32,
///     owner: Option<ObjectHandle>,
///     #[persist(skip)]
///     glow: f32,
/// }
/// ```
#[proc_macro_derive(Persist, attributes(persist))]
pub fn derive_persist(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct ContainerOptions {
    path: Option<LitStr>,
    post_load: bool,
    save_listener: bool,
    new_game_listener: bool,
    controllable: bool,
}

enum FieldMode {
    Persisted,
    Skipped,
    Core,
}

/// A persisted field: how to reach it on `self` and what to call it in logs.
struct PersistedField {
    access: proc_macro2::TokenStream,
    label: String,
    ty: syn::Type,
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();
    let options = container_options(&input.attrs)?;

    let (fields, core) = match &input.data {
        Data::Struct(data) => persisted_fields(&data.fields)?,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Persist can only be derived for structs",
            ));
        }
    };

    let generics = bounded_generics(&input.generics, &fields)?;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let writes = fields.iter().map(|f| {
        let access = &f.access;
        let label = &f.label;
        quote! { ctx.write_field(#label, &self.#access)?; }
    });

    let reads = fields.iter().map(|f| {
        let access = &f.access;
        let label = &f.label;
        quote! { self.#access = ctx.read_field(#label)?; }
    });

    let type_path = match &options.path {
        Some(path) => quote! { #path },
        None => quote! { ::core::concat!(::core::module_path!(), "::", #name_str) },
    };

    let post_load = options.post_load.then(|| {
        quote! {
            fn as_post_load(&mut self) -> ::core::option::Option<&mut dyn keepsake_persist::PostLoad> {
                ::core::option::Option::Some(self)
            }
        }
    });
    let save_listener = options.save_listener.then(|| {
        quote! {
            fn as_save_listener(&mut self) -> ::core::option::Option<&mut dyn keepsake_persist::SaveListener> {
                ::core::option::Option::Some(self)
            }
        }
    });
    let new_game_listener = options.new_game_listener.then(|| {
        quote! {
            fn as_new_game_listener(&mut self) -> ::core::option::Option<&mut dyn keepsake_persist::NewGameListener> {
                ::core::option::Option::Some(self)
            }
        }
    });

    let unused_ctx = fields.is_empty().then(|| quote! { let _ = &ctx; });

    if options.controllable && core.is_none() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`controllable` needs a field marked #[persist(core)]",
        ));
    }

    let is_destroyed = core.as_ref().map(|access| {
        quote! {
            fn is_destroyed(&self) -> bool {
                self.#access.is_destroyed()
            }
        }
    });

    let actor_impl = core.as_ref().map(|access| {
        let controllable = options.controllable.then(|| {
            quote! {
                fn as_controllable(&mut self) -> ::core::option::Option<&mut dyn keepsake_persist::Controllable> {
                    ::core::option::Option::Some(self)
                }
            }
        });
        quote! {
            impl #impl_generics keepsake_persist::Actor for #name #ty_generics #where_clause {
                fn core(&self) -> &keepsake_persist::ActorCore {
                    &self.#access
                }

                fn core_mut(&mut self) -> &mut keepsake_persist::ActorCore {
                    &mut self.#access
                }

                #controllable
            }
        }
    });

    Ok(quote! {
        impl #impl_generics keepsake_persist::PersistClass for #name #ty_generics #where_clause {
            const TYPE_PATH: &'static str = #type_path;
        }

        impl #impl_generics keepsake_persist::Persist for #name #ty_generics #where_clause {
            fn type_path(&self) -> &'static str {
                <Self as keepsake_persist::PersistClass>::TYPE_PATH
            }

            fn write_fields(
                &self,
                ctx: &mut keepsake_persist::SerializeContext<'_>,
            ) -> keepsake_persist::PersistResult<()> {
                #unused_ctx
                #(#writes)*
                ::core::result::Result::Ok(())
            }

            fn read_fields(
                &mut self,
                ctx: &mut keepsake_persist::DeserializeContext<'_>,
            ) -> keepsake_persist::PersistResult<()> {
                #unused_ctx
                #(#reads)*
                ::core::result::Result::Ok(())
            }

            #is_destroyed

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            #post_load
            #save_listener
            #new_game_listener
        }

        #actor_impl
    })
}

fn container_options(attrs: &[Attribute]) -> syn::Result<ContainerOptions> {
    let mut options = ContainerOptions::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("persist")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("path") {
                let path: LitStr = meta.value()?.parse()?;
                if path.value().is_empty() {
                    return Err(meta.error("persist path must not be empty"));
                }
                options.path = Some(path);
            } else if meta.path.is_ident("post_load") {
                options.post_load = true;
            } else if meta.path.is_ident("save_listener") {
                options.save_listener = true;
            } else if meta.path.is_ident("new_game_listener") {
                options.new_game_listener = true;
            } else if meta.path.is_ident("controllable") {
                options.controllable = true;
            } else {
                return Err(meta.error(
                    "expected one of: path, post_load, save_listener, new_game_listener, controllable",
                ));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

/// Split fields into the persisted ones and the optional actor core.
fn persisted_fields(
    fields: &Fields,
) -> syn::Result<(Vec<PersistedField>, Option<proc_macro2::TokenStream>)> {
    let mut out = Vec::new();
    let mut core = None;
    for (index, field) in fields.iter().enumerate() {
        let (access, label) = match &field.ident {
            Some(ident) => (quote! { #ident }, ident.to_string()),
            None => {
                let idx = syn::Index::from(index);
                (quote! { #idx }, index.to_string())
            }
        };
        match field_mode(&field.attrs)? {
            FieldMode::Persisted => out.push(PersistedField {
                access,
                label,
                ty: field.ty.clone(),
            }),
            FieldMode::Skipped => {}
            FieldMode::Core => {
                if core.is_some() {
                    return Err(syn::Error::new_spanned(
                        field,
                        "only one field may be marked #[persist(core)]",
                    ));
                }
                core = Some(access);
            }
        }
    }
    Ok((out, core))
}

/// Add the bounds the generated field walk needs.
fn bounded_generics(generics: &Generics, fields: &[PersistedField]) -> syn::Result<Generics> {
    if let Some(lifetime) = generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Persist types must be 'static; lifetime parameters are not supported",
        ));
    }

    let mut generics = generics.clone();
    if generics.params.is_empty() {
        return Ok(generics);
    }

    let params: Vec<syn::Ident> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in &params {
        where_clause.predicates.push(parse_quote! { #param: 'static });
    }
    for field in fields {
        let ty = &field.ty;
        where_clause
            .predicates
            .push(parse_quote! { #ty: keepsake_persist::FieldCodec });
    }
    Ok(generics)
}

fn field_mode(attrs: &[Attribute]) -> syn::Result<FieldMode> {
    let mut mode = FieldMode::Persisted;
    for attr in attrs.iter().filter(|a| a.path().is_ident("persist")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                mode = FieldMode::Skipped;
                Ok(())
            } else if meta.path.is_ident("core") {
                mode = FieldMode::Core;
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `core`"))
            }
        })?;
    }
    Ok(mode)
}
