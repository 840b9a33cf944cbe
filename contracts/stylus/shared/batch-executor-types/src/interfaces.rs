//! Solidity ABI surface of the executor and of the token calls the client batches.
//!
//! Both sides encode against these declarations, so the off-chain calldata always matches what
//! the `#[public]` methods decode.

use alloy_sol_types::sol;

sol! {
    interface IBatchExecutor {
        event OperationExecuted(address target, bool success, bytes data);

        function executeBatch(address[] targets, bytes[] payloads, uint256[] amounts)
            external
            payable
            returns (bool[] successes, bytes[] results);
        function withdraw() external;
        function initialize() external;
        function owner() external view returns (address owner);
    }

    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool success);
        function transferFrom(address from, address to, uint256 amount) external returns (bool success);
        function approve(address spender, uint256 amount) external returns (bool success);
        function allowance(address owner, address spender) external view returns (uint256 remaining);
        function balanceOf(address account) external view returns (uint256 balance);
    }
}
