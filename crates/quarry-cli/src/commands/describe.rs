//! Describe command implementation.

use crate::cli::{DescribeArgs, NodeArg};
use crate::error::Result;
use quarry_domain::NodeDescriptor;

/// Execute the describe command.
pub fn execute_describe(args: DescribeArgs) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&descriptor(args.node))?);
    Ok(())
}

/// Registration record of `node`
pub fn descriptor(node: NodeArg) -> NodeDescriptor {
    match node {
        NodeArg::Contentful => quarry_contentful::descriptor(),
        NodeArg::Opensearch => quarry_opensearch::descriptor(),
    }
}
