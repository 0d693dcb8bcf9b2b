//! The service's method table.
//!
//! Each row of `rpc_methods!` yields a [`Method`] variant, a wrapper on
//! [`MoTranslationClient`] and its deprecated `*_async` alias. Wrappers
//! spawn their request, see [`MoTranslationClient::invoke`] for the runtime
//! requirement.

use serde_json::Value;

use crate::{
    client::{Callbacks, MoTranslationClient, RpcCall},
    transport::RpcHttpClient,
};

/// Service name prefixed to every RPC method name.
pub const SERVICE_NAME: &str = "MOTranslation";

macro_rules! rpc_methods {
    ($(
        $(#[$meta:meta])*
        $Variant:ident($rpc:literal) => fn $method:ident($($arg:ident),+) -> $rets:literal;
    )*) => {
        /// Methods of the `MOTranslation` service.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum Method {
            $($Variant,)*
        }

        impl Method {
            pub const ALL: &'static [Method] = &[$(Method::$Variant,)*];

            /// Fully qualified name sent in the request envelope.
            pub const fn rpc_name(self) -> &'static str {
                match self {
                    $(Method::$Variant => concat!("MOTranslation.", $rpc),)*
                }
            }

            /// Name of the wrapper on [`MoTranslationClient`].
            pub const fn client_method_name(self) -> &'static str {
                match self {
                    $(Method::$Variant => stringify!($method),)*
                }
            }

            pub const fn param_names(self) -> &'static [&'static str] {
                match self {
                    $(Method::$Variant => &[$(stringify!($arg),)+],)*
                }
            }

            pub const fn arity(self) -> usize {
                self.param_names().len()
            }

            /// Number of values the service returns in its `result` list.
            pub const fn return_count(self) -> usize {
                match self {
                    $(Method::$Variant => $rets,)*
                }
            }
        }

        impl<C: RpcHttpClient> MoTranslationClient<C> {
            $(
                $(#[$meta])*
                pub fn $method(&self, $($arg: impl Into<Value>),+) -> RpcCall {
                    self.call(Method::$Variant, vec![$($arg.into()),+], Callbacks::default())
                }

                pastey::paste! {
                    #[deprecated(note = "use the identical method without the `_async` suffix")]
                    /// Deprecated alias, warns once per client before forwarding.
                    pub fn [<$method _async>](&self, $($arg: impl Into<Value>),+) -> RpcCall {
                        self.deprecation_warning();
                        self.$method($($arg),+)
                    }
                }
            )*
        }
    };
}

rpc_methods! {
    /// Maps feature ids (`kb|g.0.peg.1`) to MicrobesOnline locus ids.
    FidsToMoLocusIds("fids_to_moLocusIds") => fn fids_to_mo_locus_ids(fids) -> 1;
    /// Maps protein md5s to MicrobesOnline locus ids.
    ProteinsToMoLocusIds("proteins_to_moLocusIds") => fn proteins_to_mo_locus_ids(proteins) -> 1;
    /// Maps MicrobesOnline locus ids to feature ids.
    MoLocusIdsToFids("moLocusIds_to_fids") => fn mo_locus_ids_to_fids(mo_locus_ids) -> 1;
    /// Maps MicrobesOnline locus ids to protein md5s.
    MoLocusIdsToProteins("moLocusIds_to_proteins") => fn mo_locus_ids_to_proteins(mo_locus_ids) -> 1;
    /// Finds the features of a genome matching query sequences.
    ///
    /// Resolves to the whole two-element `result` list.
    MapToFid("map_to_fid") => fn map_to_fid(query_sequences, genome_id) -> 2;
    /// Like [`MoTranslationClient::map_to_fid`], matching on sequence md5s only.
    MapToFidFast("map_to_fid_fast") => fn map_to_fid_fast(query_md5s, genome_id) -> 2;
    MoLocusIdsToFidInGenome("moLocusIds_to_fid_in_genome")
        => fn mo_locus_ids_to_fid_in_genome(mo_locus_ids, genome_id) -> 2;
    MoLocusIdsToFidInGenomeFast("moLocusIds_to_fid_in_genome_fast")
        => fn mo_locus_ids_to_fid_in_genome_fast(mo_locus_ids, genome_id) -> 2;
    /// Lists the genomes of a MicrobesOnline taxonomy id.
    MoTaxonomyIdToGenomes("moTaxonomyId_to_genomes") => fn mo_taxonomy_id_to_genomes(mo_taxonomy_id) -> 1;
}
