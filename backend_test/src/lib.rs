use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one and inject
/// dependencies.
///
/// Each test gets its own server backed by an in-memory election store.
/// Injectable dependencies are [`rocket::local::asynchronous::Client`],
/// `crate::clock::ManualClock` (the clock the server reads) and
/// `crate::model::eligibility::CredentialBook` (the credentials the server
/// checks voters against).
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(
            TokenStream2::from(args).span(),
            "`backend_test` does not take arguments",
        )
        .into_compile_error()
        .into();
    }

    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract type information and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// Test setup.
            async fn setup() -> (
                rocket::local::asynchronous::Client,
                crate::clock::ManualClock,
                crate::model::eligibility::CredentialBook,
            ) {
                log4rs_test_utils::test_logging::init_logging_once_for(
                    ["votechain_backend"],
                    None,
                    None,
                );

                let clock = crate::clock::ManualClock::default();
                let credentials = crate::model::eligibility::CredentialBook::default();
                let registry = crate::model::registry::ElectionRegistry::new(
                    crate::model::store::MemoryStore::default(),
                    credentials.clone(),
                    clock.clone(),
                );
                let rocket_client = rocket::local::asynchronous::Client::tracked(crate::test_rocket(registry))
                    .await
                    .unwrap();

                (rocket_client, clock, credentials)
            }

            /// The test itself.
            #item_fn

            let runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                let (rocket_client, _clock, _credentials) = setup().await;
                #new_name(#(#test_args),*).await;
            });
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let injectable = [
        ("Client", quote! { rocket_client }),
        ("ManualClock", quote! { _clock.clone() }),
        ("CredentialBook", quote! { _credentials.clone() }),
    ];
    let mut seen = vec![];
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let (Pat::Ident(_), Type::Path(type_path)) = (&*pat_type.pat, &*pat_type.ty) {
                if let Some(segment) = type_path.path.segments.last() {
                    let found = injectable
                        .iter()
                        .find(|(type_name, _)| segment.ident == type_name);
                    if let Some((type_name, arg)) = found {
                        if seen.contains(type_name) {
                            return Err(syn::Error::new(
                                input.span(),
                                format!("Test cannot accept more than one `{type_name}`"),
                            ));
                        }
                        seen.push(*type_name);
                        args.push(arg.clone());
                        continue;
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client`, `clock_ident: ManualClock` or `credentials_ident: CredentialBook`",
        ));
    }

    Ok(args)
}
