pub mod request;
pub mod response;

pub use request::{ClientInfo, InitializeParams, JsonRpcRequest, ReadResourceParams, RpcId};
pub use response::{
    JsonRpcError, JsonRpcResponse, ListResourcesResult, ReadResourceResult, ResourceContents,
    ResourceEntry, ResourceError, ResourceErrorCode, ResourceErrorResponse,
};
